use crate::error::{Error, Result};
use crate::stamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for annotated screen recordings.
///
/// Every field has a default so a partial TOML table deserializes into a
/// usable config.
#[derive(Clone, Debug, Deserialize)]
pub struct RecorderConfig {
    /// Base directory recordings are saved under, one subdirectory per
    /// UTC day.
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
    /// Target capture rate in frames per second.
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Captured frame width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Captured frame height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Stop recording after this many seconds even if never asked to.
    #[serde(default = "default_max_seconds")]
    pub max_seconds: u64,
    /// Dated recording directories older than this many days are swept.
    #[serde(default = "default_keep_days")]
    pub keep_days: u64,
    /// x264 preset (ultrafast, veryfast, fast, medium, etc.)
    #[serde(default = "default_preset")]
    pub preset: String,
    /// x264 CRF quality (0-51, lower = better quality, larger file)
    #[serde(default = "default_crf")]
    pub crf: u8,
    /// How many times stop() polls for loop completion before giving up.
    #[serde(default = "default_stop_poll_attempts")]
    pub stop_poll_attempts: u32,
    /// Delay between completion polls, in milliseconds.
    #[serde(default = "default_stop_poll_interval_ms")]
    pub stop_poll_interval_ms: u64,
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("recordings")
}

fn default_fps() -> f64 {
    20.0
}

fn default_width() -> u32 {
    2560
}

fn default_height() -> u32 {
    1440
}

fn default_max_seconds() -> u64 {
    600
}

fn default_keep_days() -> u64 {
    7
}

fn default_preset() -> String {
    "veryfast".to_string()
}

fn default_crf() -> u8 {
    23
}

fn default_stop_poll_attempts() -> u32 {
    100
}

fn default_stop_poll_interval_ms() -> u64 {
    100
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
            max_seconds: default_max_seconds(),
            keep_days: default_keep_days(),
            preset: default_preset(),
            crf: default_crf(),
            stop_poll_attempts: default_stop_poll_attempts(),
            stop_poll_interval_ms: default_stop_poll_interval_ms(),
        }
    }
}

impl RecorderConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "frame size must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_seconds == 0 {
            return Err(Error::InvalidConfig(
                "max_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory recordings started at `now` land in: `<save_dir>/<YYYYMMDD>`.
    pub fn session_dir(&self, now: DateTime<Utc>) -> PathBuf {
        self.save_dir.join(stamp::date_stamp(now))
    }

    /// Artifact path for a case started at `now`:
    /// `<save_dir>/<YYYYMMDD>/<case>_<YYYYMMDDHHMMSS>.mp4`.
    pub fn video_path(&self, case_name: &str, now: DateTime<Utc>) -> PathBuf {
        self.session_dir(now)
            .join(format!("{}_{}.mp4", case_name, stamp::datetime_stamp(now)))
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }

    pub fn stop_poll_interval(&self) -> Duration {
        Duration::from_millis(self.stop_poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn partial_toml_fills_defaults() {
        let config: RecorderConfig = toml::from_str("fps = 10.0").expect("parse");
        assert_eq!(config.fps, 10.0);
        assert_eq!(config.width, 2560);
        assert_eq!(config.keep_days, 7);
    }

    #[test]
    fn video_path_nests_under_dated_dir() {
        let config = RecorderConfig {
            save_dir: PathBuf::from("/var/rec"),
            ..RecorderConfig::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 10, 5, 13, 14, 15).unwrap();
        let path = config.video_path("login_case", now);
        assert_eq!(
            path,
            PathBuf::from("/var/rec/20241005/login_case_20241005131415.mp4")
        );
    }

    #[test]
    fn rejects_zero_fps() {
        let config = RecorderConfig {
            fps: 0.0,
            ..RecorderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_frame() {
        let config = RecorderConfig {
            width: 0,
            ..RecorderConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
