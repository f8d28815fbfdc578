use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use webharness_capture::RecorderConfig;

/// Harness-wide settings. Every field has a default so a partial TOML
/// file (or none at all) yields a working config.
#[derive(Clone, Debug, Deserialize)]
pub struct HarnessConfig {
    /// WebDriver endpoint, e.g. a locally running chromedriver.
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default)]
    pub headless: bool,
    /// Browser window size requested at startup.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Implicit element-lookup wait, in seconds.
    #[serde(default = "default_implicit_wait_secs")]
    pub implicit_wait_secs: u64,
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,
    /// Directory the browser downloads files into.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Pause between unfocusing one session and focusing another, giving
    /// the window manager time to settle.
    #[serde(default = "default_switch_settle_ms")]
    pub switch_settle_ms: u64,
    /// Record test cases to video.
    #[serde(default = "default_record")]
    pub record: bool,
    /// Base URL recordings are reachable under, for evidence links in
    /// the log. When unset the host's LAN address is used.
    #[serde(default)]
    pub evidence_base_url: Option<String>,
    #[serde(default)]
    pub recording: RecorderConfig,
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_implicit_wait_secs() -> u64 {
    10
}

fn default_page_load_timeout_secs() -> u64 {
    30
}

fn default_switch_settle_ms() -> u64 {
    500
}

fn default_record() -> bool {
    true
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: false,
            window_width: default_window_width(),
            window_height: default_window_height(),
            implicit_wait_secs: default_implicit_wait_secs(),
            page_load_timeout_secs: default_page_load_timeout_secs(),
            download_dir: None,
            switch_settle_ms: default_switch_settle_ms(),
            record: default_record(),
            evidence_base_url: None,
            recording: RecorderConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Load from a TOML file, falling back to defaults when the file
    /// does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        toml::from_str(&contents).map_err(|e| Error::Config {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }
}
