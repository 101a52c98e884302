use std::path::Path;
use chrono::{Datelike, Local, NaiveDateTime};

/// `images/YYYY/MM/DD` for the given date.
pub fn target_dir_for<D: Datelike>(date: &D) -> String {
    format!("images/{}/{:02}/{:02}", date.year(), date.month(), date.day())
}

/// Target directory for uploads happening today (local time).
pub fn target_dir() -> String {
    target_dir_for(&Local::now())
}

/// Inserts `_YYYYMMDD_HHMMSS` between stem and extension so a re-upload of the
/// same file on the same day lands on a new path.
pub fn timestamped_filename_at(original: &str, at: NaiveDateTime) -> String {
    let path = Path::new(original);
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let stamp = at.format("%Y%m%d_%H%M%S");
    match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}_{}", stem, stamp),
    }
}

pub fn timestamped_filename(original: &str) -> String {
    timestamped_filename_at(original, Local::now().naive_local())
}
