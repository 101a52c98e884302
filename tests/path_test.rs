use chrono::{Datelike, Local, NaiveDate};
use imgdrop::upload::path::{target_dir, target_dir_for, timestamped_filename, timestamped_filename_at};

#[test]
fn test_target_dir_is_zero_padded() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    assert_eq!(target_dir_for(&date), "images/2024/03/07");

    let date = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
    assert_eq!(target_dir_for(&date), "images/1999/12/31");
}

#[test]
fn test_target_dir_follows_clock() {
    let before = Local::now();
    let dir = target_dir();
    let after = Local::now();
    // Tolerate a run straddling midnight.
    assert!(dir == target_dir_for(&before) || dir == target_dir_for(&after));
    assert!(dir.starts_with(&format!("images/{}/", before.year())) || dir.starts_with(&format!("images/{}/", after.year())));
}

#[test]
fn test_timestamp_goes_before_extension() {
    let at = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
    assert_eq!(timestamped_filename_at("cat.png", at), "cat_20240102_030405.png");
    assert_eq!(timestamped_filename_at("archive.tar.gz", at), "archive.tar_20240102_030405.gz");
    assert_eq!(timestamped_filename_at("README", at), "README_20240102_030405");
}

#[test]
fn test_reupload_gets_new_name() {
    let first = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
    let second = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 6).unwrap();
    assert_ne!(timestamped_filename_at("cat.png", first), timestamped_filename_at("cat.png", second));
}

#[test]
fn test_current_timestamp_shape() {
    let name = timestamped_filename("photo.jpg");
    let re = regex::Regex::new(r"^photo_\d{8}_\d{6}\.jpg$").unwrap();
    assert!(re.is_match(&name), "{}", name);
}
