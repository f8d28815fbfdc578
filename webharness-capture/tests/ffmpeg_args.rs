use std::path::PathBuf;
use webharness_capture::recorder_ops::{build_ffmpeg_args, normalize_even_dimensions};

#[test]
fn build_ffmpeg_args_includes_preset() {
    let args = build_ffmpeg_args(640, 500, 10.0, "veryfast", 28, &PathBuf::from("/tmp/out.mp4"));

    let preset_pos = args.iter().position(|arg| arg == "-preset").unwrap();
    assert_eq!(args[preset_pos + 1], "veryfast");
}

#[test]
fn rawvideo_input_precedes_encoder_output() {
    let args = build_ffmpeg_args(640, 500, 10.0, "veryfast", 28, &PathBuf::from("/tmp/out.mp4"));

    let size_pos = args.iter().position(|arg| arg == "-video_size").unwrap();
    assert_eq!(args[size_pos + 1], "640x500");

    let rate_pos = args.iter().position(|arg| arg == "-framerate").unwrap();
    assert_eq!(args[rate_pos + 1], "10");

    let input_pos = args.iter().position(|arg| arg == "-i").unwrap();
    let codec_pos = args.iter().position(|arg| arg == "-c:v").unwrap();
    assert!(input_pos < codec_pos);
    assert_eq!(args[codec_pos + 1], "libx264");

    // overwrite flag and output path close the invocation
    assert_eq!(args[args.len() - 2], "-y");
    assert_eq!(args[args.len() - 1], "/tmp/out.mp4");
}

#[test]
fn encoder_gets_playable_pixel_format() {
    let args = build_ffmpeg_args(640, 500, 10.0, "veryfast", 28, &PathBuf::from("/tmp/out.mp4"));

    let fmt_pos = args.iter().position(|arg| arg == "-pix_fmt").unwrap();
    assert_eq!(args[fmt_pos + 1], "yuv420p");

    let crf_pos = args.iter().position(|arg| arg == "-crf").unwrap();
    assert_eq!(args[crf_pos + 1], "28");
}

#[test]
fn odd_dimensions_round_down() {
    assert_eq!(normalize_even_dimensions(2559, 1439), (2558, 1438));
    assert_eq!(normalize_even_dimensions(2560, 1440), (2560, 1440));
    assert_eq!(normalize_even_dimensions(1, 1), (0, 0));
}
