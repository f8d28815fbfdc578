//! Frame annotation: pointer rings, click glow, and the status strip.

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Mutex;

/// Height of the strip stacked above every frame.
pub const STRIP_HEIGHT: u32 = 20;
/// Radius of the ring tracking the pointer.
pub const CURSOR_RADIUS: i32 = 15;
/// Stroke width of the pointer ring.
pub const CURSOR_STROKE: i32 = 6;
/// Added to the glow counter on each observed click.
pub const GLOW_BOOST: u32 = 4;
/// Upper bound on the glow counter, so burst clicking cannot grow the
/// ring without limit.
pub const GLOW_MAX: u32 = 24;
/// Extra ring radius per remaining glow unit.
pub const GLOW_RADIUS_STEP: i32 = 10;

const CURSOR_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
const GLOW_COLOR: Rgba<u8> = Rgba([0, 128, 0, 255]);
const SUCCESS_COLOR: Rgba<u8> = Rgba([0, 128, 0, 255]);
const FAILURE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

const STRIP_TEXT_SCALE: f32 = 14.0;

/// Outcome shown in the status strip for the current step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepStatus {
    #[default]
    Neutral,
    Success,
    Failure,
}

impl StepStatus {
    fn as_u8(self) -> u8 {
        match self {
            StepStatus::Neutral => 0,
            StepStatus::Success => 1,
            StepStatus::Failure => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => StepStatus::Success,
            2 => StepStatus::Failure,
            _ => StepStatus::Neutral,
        }
    }
}

/// Annotation inputs shared between the harness and the capture loop.
///
/// The harness writes the step label and status between test steps, the
/// click listener bumps the glow counter, and the loop reads all three
/// every frame. A glow boost may race with the loop's decay and lose an
/// increment; that only shortens the visual effect.
#[derive(Debug, Default)]
pub struct AnnotationState {
    step: Mutex<String>,
    status: AtomicU8,
    glow: AtomicU32,
}

impl AnnotationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_step(&self, label: &str) {
        let mut step = self.step.lock().unwrap_or_else(|e| e.into_inner());
        step.clear();
        step.push_str(label);
    }

    pub fn step(&self) -> String {
        self.step.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_status(&self, status: StepStatus) {
        self.status.store(status.as_u8(), Ordering::Relaxed);
    }

    pub fn status(&self) -> StepStatus {
        StepStatus::from_u8(self.status.load(Ordering::Relaxed))
    }

    /// Bump the glow counter for one click, saturating at [`GLOW_MAX`].
    pub fn boost_glow(&self) {
        let _ = self
            .glow
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |glow| {
                Some((glow + GLOW_BOOST).min(GLOW_MAX))
            });
    }

    /// Read the counter and decay it by one. Called once per frame.
    pub fn take_glow(&self) -> u32 {
        let glow = self.glow.load(Ordering::Relaxed);
        if glow > 0 {
            self.glow.store(glow - 1, Ordering::Relaxed);
        }
        glow
    }
}

/// Bounded oscillation for the neutral status color's blue channel.
///
/// The value walks between `min` and `max` by `step`, reversing at the
/// bounds, so the strip pulses instead of flashing through a wrap-around.
#[derive(Clone, Debug)]
pub struct Oscillator {
    value: i16,
    step: i16,
    min: i16,
    max: i16,
}

impl Oscillator {
    pub fn new(start: u8, step: u8, min: u8, max: u8) -> Self {
        let min = min as i16;
        let max = max as i16;
        Self {
            value: (start as i16).clamp(min, max),
            step: step as i16,
            min,
            max,
        }
    }

    /// Advance one frame and return the new value.
    pub fn tick(&mut self) -> u8 {
        self.value += self.step;
        if self.value >= self.max {
            self.value = self.max;
            self.step = -self.step;
        } else if self.value <= self.min {
            self.value = self.min;
            self.step = -self.step;
        }
        self.value as u8
    }
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new(200, 5, 80, 255)
    }
}

/// Strip background for the given status. Neutral pulses via the
/// oscillator's blue channel.
pub fn status_color(status: StepStatus, blue: u8) -> Rgba<u8> {
    match status {
        StepStatus::Neutral => Rgba([255, 255, blue, 255]),
        StepStatus::Success => SUCCESS_COLOR,
        StepStatus::Failure => FAILURE_COLOR,
    }
}

fn draw_ring(image: &mut RgbaImage, cx: i32, cy: i32, radius: i32, stroke: i32, color: Rgba<u8>) {
    if radius <= 0 || stroke <= 0 {
        return;
    }
    let inner = (radius - stroke).max(0);
    let inner_sq = inner * inner;
    let outer_sq = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist_sq = dx * dx + dy * dy;
            if dist_sq > outer_sq || dist_sq < inner_sq {
                continue;
            }
            let px = cx + dx;
            let py = cy + dy;
            if px < 0 || py < 0 {
                continue;
            }
            if let Some(pixel) = image.get_pixel_mut_checked(px as u32, py as u32) {
                *pixel = color;
            }
        }
    }
}

/// Ring that tracks the pointer every frame. Out-of-bounds pixels are
/// skipped, so positions at or past the frame edge are safe.
pub fn draw_cursor_ring(image: &mut RgbaImage, x: i32, y: i32) {
    draw_ring(image, x, y, CURSOR_RADIUS, CURSOR_STROKE, CURSOR_COLOR);
}

/// Click feedback ring around the pointer. The radius scales with the
/// decaying glow counter, so the ring shrinks back toward the cursor over
/// the frames after a click.
pub fn draw_glow_ring(image: &mut RgbaImage, x: i32, y: i32, glow: u32) {
    if glow == 0 {
        return;
    }
    let glow = glow.min(GLOW_MAX);
    let radius = CURSOR_RADIUS + glow as i32 * GLOW_RADIUS_STEP;
    draw_ring(image, x, y, radius, CURSOR_STROKE / 2, GLOW_COLOR);
}

/// Locations probed for a strip font. First readable TTF wins.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a font for the status strip, if any candidate exists on this
/// host. Without one the strip still renders, just without text.
pub fn load_strip_font() -> Option<FontArc> {
    for path in FONT_CANDIDATES {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(data) {
                return Some(font);
            }
        }
    }
    tracing::debug!("no strip font found, rendering status strip without text");
    None
}

/// Render the strip stacked above every frame: status-colored background
/// with the timestamp and step label drawn at the left edge.
pub fn render_status_strip(
    width: u32,
    color: Rgba<u8>,
    text: &str,
    font: Option<&FontArc>,
) -> RgbaImage {
    let mut strip = RgbaImage::from_pixel(width, STRIP_HEIGHT, color);
    if let Some(font) = font {
        let scale = PxScale::from(STRIP_TEXT_SCALE);
        draw_text_mut(&mut strip, TEXT_COLOR, 10, 5, scale, font, text);
    }
    strip
}

/// Stack the strip above the frame into `out` as raw RGBA bytes. Both
/// images must share the same width.
pub fn stack_into(out: &mut Vec<u8>, strip: &RgbaImage, frame: &RgbaImage) {
    out.clear();
    out.extend_from_slice(strip.as_raw());
    out.extend_from_slice(frame.as_raw());
}
