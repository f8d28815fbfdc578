//! Recording lifecycle: one capture thread and one click-listener thread
//! per session, controlled through a handle the harness drives between
//! test steps.

use crate::annotate::{load_strip_font, AnnotationState, StepStatus, STRIP_HEIGHT};
use crate::config::RecorderConfig;
use crate::encoder::{FfmpegWriter, VideoWriter};
use crate::error::Result;
use crate::recorder_ops::{
    build_ffmpeg_args, normalize_even_dimensions, poll_finished, run_capture_loop,
    run_click_listener,
};
use crate::retention;
use crate::source::{DevicePointer, ScreenSource, SystemClock};
use ab_glyph::FontArc;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const CLICK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// State shared between the capture loop, the click listener, and the
/// controlling handle.
#[derive(Debug, Default)]
pub struct RecorderShared {
    /// Cooperative cancellation, checked at the top of each iteration.
    pub stop: AtomicBool,
    /// Set once the video and summary are finalized.
    pub finished: AtomicBool,
    /// Clicks observed by the listener.
    pub clicks: AtomicU64,
    pub annotations: AnnotationState,
}

/// Counters accumulated by the capture loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureStats {
    /// Frames handed to the encoder.
    pub frames_written: u64,
    /// Grabs that failed and were skipped.
    pub grabs_failed: u64,
    /// Iterations that missed their pacing slot.
    pub frames_late: u64,
}

/// Written next to the video as `<name>.json` once the loop ends.
#[derive(Clone, Debug, Serialize)]
pub struct RecorderSummary {
    pub case_name: String,
    pub video: String,
    pub started_at: String,
    pub ended_at: String,
    pub frames_written: u64,
    pub grabs_failed: u64,
    pub frames_late: u64,
    pub clicks: u64,
    pub fps: f64,
    pub max_seconds: u64,
}

/// Annotated screen recorder for test evidence.
pub struct Recorder {
    config: RecorderConfig,
}

impl Recorder {
    pub fn new(config: RecorderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Sweep expired recordings, spawn the encoder and the capture and
    /// click-listener threads, and hand back the control handle.
    pub fn start(&self, case_name: &str) -> Result<RecorderHandle> {
        let started_at = Utc::now();
        retention::sweep_expired(&self.config.save_dir, self.config.keep_days, started_at);

        let session_dir = self.config.session_dir(started_at);
        fs::create_dir_all(&session_dir)?;
        let video_path = self.config.video_path(case_name, started_at);

        let (width, height) = normalize_even_dimensions(self.config.width, self.config.height);
        let args = build_ffmpeg_args(
            width,
            height + STRIP_HEIGHT,
            self.config.fps,
            &self.config.preset,
            self.config.crf,
            &video_path,
        );
        let writer = Box::new(FfmpegWriter::new(&args)?);

        let shared = Arc::new(RecorderShared::default());
        let font = load_strip_font();

        let capture = spawn_capture_thread(
            self.config.clone(),
            Arc::clone(&shared),
            writer,
            font,
            case_name.to_string(),
            video_path.clone(),
            started_at,
        );
        let listener = spawn_listener_thread(Arc::clone(&shared));

        tracing::info!(case = case_name, video = %video_path.display(), "recording started");

        Ok(RecorderHandle {
            config: self.config.clone(),
            shared,
            video_path,
            capture: Some(capture),
            listener: Some(listener),
        })
    }
}

/// Control surface for an in-flight recording. Dropping it without
/// calling [`stop`](RecorderHandle::stop) signals the threads to wind
/// down but does not wait for the artifact.
pub struct RecorderHandle {
    config: RecorderConfig,
    shared: Arc<RecorderShared>,
    video_path: PathBuf,
    capture: Option<JoinHandle<()>>,
    listener: Option<JoinHandle<()>>,
}

impl RecorderHandle {
    /// Set the step label shown in the status strip.
    pub fn annotate_step(&self, label: &str) {
        self.shared.annotations.set_step(label);
    }

    /// Set the strip color for the remaining frames.
    pub fn set_status(&self, status: StepStatus) {
        self.shared.annotations.set_status(status);
    }

    pub fn video_path(&self) -> &Path {
        &self.video_path
    }

    /// Signal the loop to stop and wait (bounded) for the artifact to be
    /// finalized. Returns the video path either way; when the wait runs
    /// out, the file may still be missing its trailing frames.
    pub fn stop(mut self) -> PathBuf {
        self.shared.stop.store(true, Ordering::Relaxed);

        let finished = poll_finished(
            &self.shared,
            self.config.stop_poll_attempts,
            self.config.stop_poll_interval(),
            &SystemClock,
        );
        if finished {
            if let Some(handle) = self.capture.take() {
                let _ = handle.join();
            }
            if let Some(handle) = self.listener.take() {
                let _ = handle.join();
            }
        } else {
            tracing::warn!(
                video = %self.video_path.display(),
                "recording did not finish within the stop window"
            );
        }

        self.video_path.clone()
    }
}

impl Drop for RecorderHandle {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Relaxed);
    }
}

fn spawn_capture_thread(
    config: RecorderConfig,
    shared: Arc<RecorderShared>,
    mut writer: Box<dyn VideoWriter>,
    font: Option<FontArc>,
    case_name: String,
    video_path: PathBuf,
    started_at: DateTime<Utc>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stats = run_with_real_sources(&config, &shared, writer.as_mut(), font.as_ref())
            .unwrap_or_else(|e| {
                tracing::error!("capture unavailable: {e}");
                Default::default()
            });

        if let Err(e) = writer.flush() {
            tracing::warn!("failed to flush encoder: {e}");
        }
        if let Err(e) = writer.finish() {
            tracing::warn!("failed to finish encoder: {e}");
        }

        write_summary(&video_path, &case_name, &config, &shared, &stats, started_at);
        shared.finished.store(true, Ordering::Relaxed);
    })
}

fn run_with_real_sources(
    config: &RecorderConfig,
    shared: &RecorderShared,
    writer: &mut dyn VideoWriter,
    font: Option<&FontArc>,
) -> Result<CaptureStats> {
    let (width, height) = normalize_even_dimensions(config.width, config.height);
    let mut source = ScreenSource::new(width, height)?;
    let pointer = DevicePointer::new()?;
    Ok(run_capture_loop(
        config,
        shared,
        &mut source,
        &pointer,
        writer,
        &SystemClock,
        font,
    ))
}

fn spawn_listener_thread(shared: Arc<RecorderShared>) -> JoinHandle<()> {
    thread::spawn(move || {
        let pointer = match DevicePointer::new() {
            Ok(pointer) => pointer,
            Err(e) => {
                tracing::debug!("click listener disabled: {e}");
                return;
            }
        };
        run_click_listener(&shared, &pointer, &SystemClock, CLICK_POLL_INTERVAL);
    })
}

fn write_summary(
    video_path: &Path,
    case_name: &str,
    config: &RecorderConfig,
    shared: &RecorderShared,
    stats: &CaptureStats,
    started_at: DateTime<Utc>,
) {
    let summary = RecorderSummary {
        case_name: case_name.to_string(),
        video: video_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        started_at: started_at.to_rfc3339(),
        ended_at: Utc::now().to_rfc3339(),
        frames_written: stats.frames_written,
        grabs_failed: stats.grabs_failed,
        frames_late: stats.frames_late,
        clicks: shared.clicks.load(Ordering::Relaxed),
        fps: config.fps,
        max_seconds: config.max_seconds,
    };

    let path = video_path.with_extension("json");
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            if let Err(e) = fs::write(&path, json) {
                tracing::warn!("failed to write recording summary: {e}");
            }
        }
        Err(e) => tracing::warn!("failed to serialize recording summary: {e}"),
    }
}
