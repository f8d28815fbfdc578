//! Timestamp formats shared by artifact naming and the status strip.

use chrono::{DateTime, Utc};

/// Day stamp used for dated recording directories (`YYYYMMDD`).
///
/// Retention relies on this being fixed-width and zero-padded: directory
/// names are compared lexicographically against a cutoff in the same
/// format.
pub fn date_stamp(t: DateTime<Utc>) -> String {
    t.format("%Y%m%d").to_string()
}

/// Second-resolution stamp used in video file names (`YYYYMMDDHHMMSS`).
pub fn datetime_stamp(t: DateTime<Utc>) -> String {
    t.format("%Y%m%d%H%M%S").to_string()
}

/// Human-readable stamp rendered into the status strip.
pub fn display_stamp(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}
