use chrono::{TimeZone, Utc};
use std::fs;
use std::path::Path;
use webharness_capture::retention::sweep_expired;
use webharness_capture::stamp;

fn make_dir(base: &Path, name: &str) {
    fs::create_dir(base.join(name)).expect("create dir");
    // a file inside proves the delete is recursive
    fs::write(base.join(name).join("case_20240101000000.mp4"), b"x").expect("write file");
}

#[test]
fn removes_only_expired_dated_dirs() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let base = tmp.path();
    let now = Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap();

    make_dir(base, "20240901"); // past the window
    make_dir(base, "20240927"); // one day past the window
    make_dir(base, "20240928"); // exactly the cutoff
    make_dir(base, "20241004"); // inside the window
    make_dir(base, "notadate");
    make_dir(base, "2024093"); // seven digits, malformed
    fs::write(base.join("20240801"), b"a file, not a dir").expect("write");

    sweep_expired(base, 7, now);

    assert!(!base.join("20240901").exists());
    assert!(!base.join("20240927").exists());
    assert!(base.join("20240928").exists());
    assert!(base.join("20241004").exists());
    assert!(base.join("notadate").exists());
    assert!(base.join("2024093").exists());
    assert!(base.join("20240801").exists());
}

#[test]
fn cutoff_is_strictly_older_than() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let base = tmp.path();
    let now = Utc.with_ymd_and_hms(2024, 10, 5, 0, 0, 0).unwrap();

    // keep_days = 0 keeps today and removes yesterday
    make_dir(base, "20241005");
    make_dir(base, "20241004");

    sweep_expired(base, 0, now);

    assert!(base.join("20241005").exists());
    assert!(!base.join("20241004").exists());
}

#[test]
fn zero_padded_stamps_compare_chronologically() {
    // The sweep compares names as strings, which is only sound because
    // date_stamp pads every field to fixed width.
    let sep = Utc.with_ymd_and_hms(2024, 9, 5, 0, 0, 0).unwrap();
    let oct = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();
    assert_eq!(stamp::date_stamp(sep), "20240905");
    assert_eq!(stamp::date_stamp(oct), "20241001");
    assert!(stamp::date_stamp(sep) < stamp::date_stamp(oct));

    let tmp = tempfile::tempdir().expect("tempdir");
    let base = tmp.path();
    make_dir(base, "20240905");
    make_dir(base, "20241001");

    // cutoff lands between the two stamps
    sweep_expired(base, 10, Utc.with_ymd_and_hms(2024, 10, 3, 0, 0, 0).unwrap());

    assert!(!base.join("20240905").exists());
    assert!(base.join("20241001").exists());
}

#[test]
fn missing_base_directory_is_a_noop() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let missing = tmp.path().join("never-created");
    let now = Utc.with_ymd_and_hms(2024, 10, 5, 0, 0, 0).unwrap();

    sweep_expired(&missing, 7, now);

    assert!(!missing.exists());
}
