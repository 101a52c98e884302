use std::io;
use serde_json::Value;
use crate::error::{Result, UploadError};
use crate::postimage::driver::UploadFormDriver;
use crate::postimage::extract::with_download_suffix;
use crate::runtime::logger::WorkflowLogger;
use crate::upload::{BatchOutcome, UploadResult, UploadSlot, require_slots};

/// Top-level entry for the PostImage node: one submission for all present
/// slots, all-or-nothing.
pub async fn upload_batch<D: UploadFormDriver + ?Sized>(inputs: &Value, driver: &D, logger: &dyn WorkflowLogger) -> BatchOutcome {
    let slots = match require_slots(inputs) {
        Ok(slots) => slots,
        Err(e) => {
            let msg = format!("Failed to process images: {}", e);
            logger.error(&msg);
            return BatchOutcome::failed(msg);
        }
    };

    logger.info(&format!("Uploading {} images to PostImage", slots.len()));

    let mut paths = Vec::with_capacity(slots.len());
    for slot in &slots {
        match resolve_local_file(slot).await {
            Ok(path) => paths.push(path),
            Err(e) => {
                let msg = format!("Failed to upload image {} ({}): {}", slot.index, slot.file_name(), e);
                logger.error(&msg);
                return BatchOutcome::failed(msg);
            }
        }
    }

    let submitted = driver.submit_files(&paths)
        .await
        .and_then(|urls| assign_urls(&slots, urls));

    match submitted {
        Ok(results) => {
            for slot in &slots {
                logger.info(&format!("Successfully uploaded image {}: {}", slot.index, slot.file_name()));
            }
            BatchOutcome::from_results(results)
        }
        Err(e @ UploadError::BrowserLaunch(_)) => {
            let msg = format!("Failed to process images: {}", e);
            logger.error(&msg);
            BatchOutcome::failed(msg)
        }
        Err(e) => {
            let msg = format!("Failed to upload images: {}", e);
            logger.error(&msg);
            BatchOutcome::failed(msg)
        }
    }
}

/// Absolute path of a slot's file, once it is known to be a readable regular
/// file. The upload form gives no feedback on a bad path, so this is checked
/// before the browser sees it.
pub async fn resolve_local_file(slot: &UploadSlot) -> Result<String> {
    let file_read = |source: io::Error| UploadError::FileRead { path: slot.local_path.clone(), source };

    let path = tokio::fs::canonicalize(&slot.local_path).await.map_err(file_read)?;
    let meta = tokio::fs::metadata(&path).await.map_err(file_read)?;
    if !meta.is_file() {
        return Err(file_read(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file")));
    }
    tokio::fs::File::open(&path).await.map_err(file_read)?;

    Ok(path.to_string_lossy().into_owned())
}

/// Pairs scraped links with slots by position. The page gives no per-file
/// acknowledgement, so a count mismatch throws the whole batch away.
pub fn assign_urls(slots: &[UploadSlot], urls: Vec<String>) -> Result<Vec<UploadResult>> {
    if urls.len() != slots.len() {
        return Err(UploadError::UrlCountMismatch { expected: slots.len(), found: urls.len() });
    }
    Ok(slots.iter()
        .zip(urls)
        .map(|(slot, url)| UploadResult::success(slot.index, with_download_suffix(&url)))
        .collect())
}
