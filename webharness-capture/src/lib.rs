//! webharness-capture: annotated screen recording for browser test
//! evidence.
//!
//! A background capture loop grabs the screen at a target rate, overlays
//! pointer position, click glow, and a step/status strip, and pipes the
//! frames into ffmpeg. Recordings land in dated directories that are
//! swept by age when a new recording starts.

pub mod annotate;
pub mod config;
pub mod encoder;
pub mod error;
pub mod recorder;
pub mod recorder_ops;
pub mod retention;
pub mod source;
pub mod stamp;

// Re-export common types at crate root
pub use annotate::{AnnotationState, Oscillator, StepStatus};
pub use config::RecorderConfig;
pub use encoder::{FfmpegWriter, VideoWriter};
pub use error::{Error, Result};
pub use recorder::{CaptureStats, Recorder, RecorderHandle, RecorderShared, RecorderSummary};
pub use source::{Clock, FrameSource, PointerSource};
