use anyhow::Result;
use std::time::Duration;
use webharness_capture::{Recorder, RecorderConfig, StepStatus};

#[test]
#[ignore = "requires a display, pointer access, and ffmpeg in PATH"]
fn records_a_short_annotated_clip() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let config = RecorderConfig {
        save_dir: tmp.path().to_path_buf(),
        fps: 10.0,
        width: 1280,
        height: 720,
        max_seconds: 10,
        ..RecorderConfig::default()
    };

    let recorder = Recorder::new(config)?;
    let handle = recorder.start("smoke_case")?;

    handle.annotate_step("opening the page");
    std::thread::sleep(Duration::from_secs(1));
    handle.annotate_step("submitting the form");
    std::thread::sleep(Duration::from_secs(1));
    handle.set_status(StepStatus::Success);

    let video = handle.stop();
    assert!(video.exists(), "video not written: {}", video.display());

    let summary = video.with_extension("json");
    assert!(summary.exists(), "summary not written");
    let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(summary)?)?;
    assert!(parsed["frames_written"].as_u64().unwrap() > 0);
    Ok(())
}
