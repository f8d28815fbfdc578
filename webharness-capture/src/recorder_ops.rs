use crate::annotate::{
    draw_cursor_ring, draw_glow_ring, render_status_strip, stack_into, status_color, Oscillator,
    STRIP_HEIGHT,
};
use crate::config::RecorderConfig;
use crate::encoder::VideoWriter;
use crate::recorder::{CaptureStats, RecorderShared};
use crate::source::{Clock, FrameSource, PointerSource};
use crate::stamp;
use ab_glyph::FontArc;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// libx264 rejects odd dimensions; round the configured size down.
pub fn normalize_even_dimensions(width: u32, height: u32) -> (u32, u32) {
    let width = if width % 2 != 0 {
        width.saturating_sub(1)
    } else {
        width
    };
    let height = if height % 2 != 0 {
        height.saturating_sub(1)
    } else {
        height
    };
    (width, height)
}

/// ffmpeg invocation for rawvideo RGBA on stdin, H.264 out.
pub fn build_ffmpeg_args(
    width: u32,
    height: u32,
    fps: f64,
    preset: &str,
    crf: u8,
    output_path: &Path,
) -> Vec<String> {
    vec![
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pixel_format".to_string(),
        "rgba".to_string(),
        "-video_size".to_string(),
        format!("{}x{}", width, height),
        "-framerate".to_string(),
        format!("{}", fps),
        "-i".to_string(),
        "-".to_string(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        preset.to_string(),
        "-crf".to_string(),
        crf.to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-y".to_string(),
        output_path.display().to_string(),
    ]
}

/// Capture frames until the stop flag is set or the configured duration
/// elapses.
///
/// Each iteration grabs a frame, draws the pointer ring and any click
/// glow, renders the status strip above the frame, and appends the
/// stacked result to the writer. Pacing is drift-tolerant: the loop
/// sleeps toward fixed slots and counts the ones it misses. A failed
/// grab is counted and skipped; the frame slot stays empty.
pub fn run_capture_loop(
    config: &RecorderConfig,
    shared: &RecorderShared,
    frame_source: &mut dyn FrameSource,
    pointer: &dyn PointerSource,
    writer: &mut dyn VideoWriter,
    clock: &dyn Clock,
    font: Option<&FontArc>,
) -> CaptureStats {
    let frame_interval = config.frame_interval();
    let started_at = clock.now();
    let mut next_frame_at = started_at;

    let (width, height) = normalize_even_dimensions(config.width, config.height);
    let stacked_len = (width as usize) * ((height + STRIP_HEIGHT) as usize) * 4;
    let mut stacked = Vec::with_capacity(stacked_len);
    let mut oscillator = Oscillator::default();

    let mut stats = CaptureStats::default();

    loop {
        if shared.stop.load(Ordering::Relaxed) {
            break;
        }
        if clock.now().duration_since(started_at).as_secs() >= config.max_seconds {
            break;
        }

        let mut now = clock.now();
        if now < next_frame_at {
            clock.sleep(next_frame_at - now);
            now = clock.now();
        }
        if now > next_frame_at + frame_interval {
            stats.frames_late += 1;
        }
        next_frame_at += frame_interval;

        let mut frame = match frame_source.grab() {
            Ok(frame) => frame,
            Err(e) => {
                stats.grabs_failed += 1;
                tracing::debug!("frame grab failed, skipping: {e}");
                continue;
            }
        };
        if frame.dimensions() != (width, height) {
            stats.grabs_failed += 1;
            tracing::debug!(
                "unexpected frame size {:?}, skipping",
                frame.dimensions()
            );
            continue;
        }

        let (px, py) = pointer.position();
        draw_cursor_ring(&mut frame, px, py);
        let glow = shared.annotations.take_glow();
        draw_glow_ring(&mut frame, px, py, glow);

        let color = status_color(shared.annotations.status(), oscillator.tick());
        let label = format!(
            "{} {}",
            stamp::display_stamp(clock.utc_now()),
            shared.annotations.step()
        );
        let strip = render_status_strip(width, color, &label, font);
        stack_into(&mut stacked, &strip, &frame);

        if let Err(e) = writer.write_frame(&stacked) {
            tracing::warn!("failed to write to encoder: {e}");
            break;
        }
        stats.frames_written += 1;
    }

    stats
}

/// Poll the pointer for left-button presses, bumping the glow counter and
/// click tally on each rising edge. Exits once the recording stops.
pub fn run_click_listener(
    shared: &RecorderShared,
    pointer: &dyn PointerSource,
    clock: &dyn Clock,
    poll_interval: Duration,
) {
    let mut was_down = false;
    while !shared.stop.load(Ordering::Relaxed) && !shared.finished.load(Ordering::Relaxed) {
        let down = pointer.left_button_down();
        if down && !was_down {
            shared.annotations.boost_glow();
            shared.clicks.fetch_add(1, Ordering::Relaxed);
        }
        was_down = down;
        clock.sleep(poll_interval);
    }
}

/// Bounded wait for the capture thread to finalize the artifact. Returns
/// whether completion was observed within `attempts` polls.
pub fn poll_finished(
    shared: &RecorderShared,
    attempts: u32,
    interval: Duration,
    clock: &dyn Clock,
) -> bool {
    for _ in 0..attempts {
        if shared.finished.load(Ordering::Relaxed) {
            return true;
        }
        clock.sleep(interval);
    }
    shared.finished.load(Ordering::Relaxed)
}
