//! Collaborator seams for the capture loop: screen frames, pointer
//! state, and time. Each has a real implementation here and fakes in the
//! tests.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use device_query::{DeviceQuery, DeviceState};
use image::imageops::FilterType;
use image::RgbaImage;
use std::time::{Duration, Instant};
use xcap::Monitor;

/// One full-screen grab per call. The loop owns pacing; implementations
/// just return the freshest frame they can.
pub trait FrameSource {
    fn grab(&mut self) -> Result<RgbaImage>;
}

/// Pointer state, polled by the loop for position and by the click
/// listener for button edges.
pub trait PointerSource {
    fn position(&self) -> (i32, i32);
    fn left_button_down(&self) -> bool;
}

/// Time source, swappable in tests.
pub trait Clock {
    fn now(&self) -> Instant;
    fn utc_now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Grabs the primary monitor, resizing to the configured frame size when
/// the panel resolution differs.
pub struct ScreenSource {
    monitor: Monitor,
    width: u32,
    height: u32,
}

impl ScreenSource {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let mut monitors = Monitor::all()
            .map_err(|e| Error::CaptureFailed(format!("monitor enumeration failed: {e}")))?;
        if monitors.is_empty() {
            return Err(Error::CaptureFailed("no monitors detected".to_string()));
        }
        let primary = monitors
            .iter()
            .position(|m| m.is_primary().unwrap_or(false))
            .unwrap_or(0);
        let monitor = monitors.swap_remove(primary);
        Ok(Self {
            monitor,
            width,
            height,
        })
    }
}

impl FrameSource for ScreenSource {
    fn grab(&mut self) -> Result<RgbaImage> {
        let image = self
            .monitor
            .capture_image()
            .map_err(|e| Error::CaptureFailed(e.to_string()))?;
        if image.dimensions() == (self.width, self.height) {
            return Ok(image);
        }
        Ok(image::imageops::resize(
            &image,
            self.width,
            self.height,
            FilterType::Triangle,
        ))
    }
}

/// Pointer state via the device-query polling API.
pub struct DevicePointer {
    state: DeviceState,
}

impl DevicePointer {
    pub fn new() -> Result<Self> {
        let state = DeviceState::checked_new().ok_or_else(|| {
            Error::CaptureFailed("no input backend available for pointer tracking".to_string())
        })?;
        Ok(Self { state })
    }
}

impl PointerSource for DevicePointer {
    fn position(&self) -> (i32, i32) {
        self.state.get_mouse().coords
    }

    fn left_button_down(&self) -> bool {
        // button_pressed is 1-indexed; 1 is the left button
        self.state
            .get_mouse()
            .button_pressed
            .get(1)
            .copied()
            .unwrap_or(false)
    }
}
