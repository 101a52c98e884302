use serde_json::Value;
use crate::error::{Result, UploadError};
use crate::gitee::client::ImageUploader;
use crate::runtime::logger::WorkflowLogger;
use crate::upload::{BatchOutcome, SingleOutcome, UploadSlot, require_slots};
use crate::upload::locator::RepositoryLocator;
use crate::upload::path::target_dir;

/// Everything resolved from the node inputs before any network traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub slots: Vec<UploadSlot>,
    pub repo: RepositoryLocator,
    pub target_dir: String,
}

impl BatchPlan {
    /// Reads `img1..img8` and `repo_url`. Slots are checked first so an empty
    /// batch is reported even when the locator is also bad.
    pub fn from_inputs(inputs: &Value) -> Result<Self> {
        let slots = require_slots(inputs)?;
        let repo = RepositoryLocator::parse(required_str(inputs, "repo_url")?)?;
        Ok(Self {
            slots,
            repo,
            target_dir: target_dir(),
        })
    }

    /// Uploads slot by slot and stops at the first failure; slots after it
    /// keep an empty URL.
    pub async fn run<U: ImageUploader + ?Sized>(&self, uploader: &U, logger: &dyn WorkflowLogger) -> BatchOutcome {
        logger.info(&format!("Uploading {} images to Gitee repository: {}", self.slots.len(), self.repo));
        logger.info(&format!("Target directory: {}", self.target_dir));

        let mut outcome = BatchOutcome::default();
        for slot in &self.slots {
            let result = uploader.upload(slot, &self.repo, &self.target_dir, logger).await;
            if !outcome.record(result) {
                break;
            }
        }

        if outcome.overall_success {
            logger.info("All images uploaded successfully");
        }
        outcome
    }
}

/// Top-level entry for the eight-slot node. `connect` opens the HTTP session
/// and is only called once the inputs are known to be usable.
pub async fn upload_batch<U, F>(inputs: &Value, logger: &dyn WorkflowLogger, connect: F) -> BatchOutcome
where
    U: ImageUploader,
    F: FnOnce() -> U,
{
    match BatchPlan::from_inputs(inputs) {
        Ok(plan) => {
            let uploader = connect();
            plan.run(&uploader, logger).await
        }
        Err(e) => {
            let msg = format!("Failed to process images: {}", e);
            logger.error(&msg);
            BatchOutcome::failed(msg)
        }
    }
}

/// Top-level entry for the single-image node (`img`, `repo_url`).
pub async fn upload_single<U, F>(inputs: &Value, logger: &dyn WorkflowLogger, connect: F) -> SingleOutcome
where
    U: ImageUploader,
    F: FnOnce() -> U,
{
    let prepared = required_str(inputs, "img")
        .and_then(|img| {
            let repo = RepositoryLocator::parse(required_str(inputs, "repo_url")?)?;
            Ok((UploadSlot::new(1, img), repo))
        });

    match prepared {
        Ok((slot, repo)) => {
            let dir = target_dir();
            logger.info(&format!("Uploading {} to Gitee repository: {}", slot.file_name(), repo));
            let uploader = connect();
            uploader.upload(&slot, &repo, &dir, logger).await.into()
        }
        Err(e) => {
            let msg = format!("Failed to process image: {}", e);
            logger.error(&msg);
            SingleOutcome::failed(msg)
        }
    }
}

fn required_str<'a>(inputs: &'a Value, key: &str) -> Result<&'a str> {
    let value = inputs.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    match (key, value) {
        (_, Some(v)) => Ok(v),
        ("img", None) => Err(UploadError::NoImagesProvided),
        (_, None) => Err(UploadError::MissingInput(key.to_string())),
    }
}
