//! Age-based cleanup of dated recording directories.

use crate::stamp;
use chrono::{DateTime, Days, Utc};
use std::fs;
use std::path::Path;

/// Delete immediate subdirectories of `base` whose name is a `YYYYMMDD`
/// stamp strictly older than `keep_days` before `now`. Anything else,
/// files, malformed names, fresher directories, is left alone. Deletion
/// errors are logged and skipped so one stuck directory cannot stall the
/// sweep.
pub fn sweep_expired(base: &Path, keep_days: u64, now: DateTime<Utc>) {
    let cutoff = match now.checked_sub_days(Days::new(keep_days)) {
        Some(t) => stamp::date_stamp(t),
        None => return,
    };

    let entries = match fs::read_dir(base) {
        Ok(entries) => entries,
        // base may not exist yet on the first run
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let name = match file_name.to_str() {
            Some(name) => name,
            None => continue,
        };
        if !is_date_dir_name(name) {
            continue;
        }
        // Lexicographic order matches chronological order because the
        // stamp is fixed-width and zero-padded.
        if name >= cutoff.as_str() {
            continue;
        }
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match fs::remove_dir_all(&path) {
            Ok(()) => {
                tracing::info!(dir = %path.display(), "removed expired recording directory")
            }
            Err(e) => tracing::warn!(
                dir = %path.display(),
                "failed to remove expired recording directory: {e}"
            ),
        }
    }
}

/// Exactly eight ASCII digits, the shape `date_stamp` produces.
pub fn is_date_dir_name(name: &str) -> bool {
    name.len() == 8 && name.bytes().all(|b| b.is_ascii_digit())
}
