use imgdrop::upload::{BatchOutcome, SingleOutcome, SuccessEncoding, UploadResult, UploadSlot, collect_slots, require_slots};
use imgdrop::error::UploadError;
use serde_json::json;

#[test]
fn test_collect_slots_keeps_original_indices() {
    let inputs = json!({
        "img1": "/tmp/a.png",
        "img2": "",
        "img4": "/tmp/b.png",
        "img7": "/tmp/c.png",
        "img8": "   ",
        "img9": "/tmp/ignored.png",
        "repo_url": "alice/pics",
    });
    let slots = collect_slots(&inputs);
    assert_eq!(slots, vec![
        UploadSlot::new(1, "/tmp/a.png"),
        UploadSlot::new(4, "/tmp/b.png"),
        UploadSlot::new(7, "/tmp/c.png"),
    ]);
}

#[test]
fn test_require_slots_rejects_empty_batch() {
    let err = require_slots(&json!({"img1": ""})).unwrap_err();
    assert!(matches!(err, UploadError::NoImagesProvided));
}

#[test]
fn test_slot_file_name_is_basename() {
    assert_eq!(UploadSlot::new(3, "/data/in/cat.png").file_name(), "cat.png");
}

#[test]
fn test_fold_stops_at_first_failure() {
    let outcome = BatchOutcome::from_results(vec![
        UploadResult::success(1, "u1"),
        UploadResult::failure(4, "boom on 4"),
        UploadResult::success(7, "u7"),
    ]);
    assert!(!outcome.overall_success);
    assert_eq!(outcome.url(1), "u1");
    assert_eq!(outcome.url(4), "");
    assert_eq!(outcome.url(7), "");
    assert_eq!(outcome.error_message, "boom on 4");
}

#[test]
fn test_output_record_shapes() {
    let outcome = BatchOutcome::from_results(vec![
        UploadResult::success(2, "https://x/2"),
    ]);

    let out = outcome.to_output(SuccessEncoding::Bool);
    assert_eq!(out, json!({
        "url1": "", "url2": "https://x/2", "url3": "", "url4": "",
        "url5": "", "url6": "", "url7": "", "url8": "",
        "success": true,
        "error_message": "",
    }));

    let failed = BatchOutcome::failed("nope").to_output(SuccessEncoding::Text);
    assert_eq!(failed["success"], json!("false"));
    assert_eq!(failed["error_message"], json!("nope"));
    assert_eq!(outcome.to_output(SuccessEncoding::Text)["success"], json!("true"));
}

#[test]
fn test_out_of_range_index_is_ignored() {
    let outcome = BatchOutcome::from_results(vec![UploadResult::success(9, "x")]);
    assert!(outcome.urls().iter().all(|u| u.is_empty()));
    assert_eq!(outcome.url(0), "");
}

#[test]
fn test_single_outcome_from_result() {
    let ok: SingleOutcome = UploadResult::success(1, "https://x").into();
    assert_eq!(ok.to_output(), json!({"url": "https://x", "success": true, "error_message": ""}));

    let bad: SingleOutcome = UploadResult::failure(1, "bad").into();
    assert_eq!(bad.to_output(), json!({"url": "", "success": false, "error_message": "bad"}));
}

#[test]
fn test_collect_slots_trims_paths() {
    let slots = collect_slots(&json!({"img1": "  /a/photo.png \n", "img2": "\t/b/photo.png"}));
    assert_eq!(slots, vec![
        UploadSlot::new(1, "/a/photo.png"),
        UploadSlot::new(2, "/b/photo.png"),
    ]);
}
