pub mod locator;
pub mod path;

use std::path::Path;
use serde_json::{Map, Value, json};
use crate::error::{Result, UploadError};

/// Number of image inputs a batch node exposes (`img1..img8`).
pub const MAX_SLOTS: usize = 8;

/// 一个上传槽位：保留用户输入时的 1-based 序号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    pub index: usize,
    pub local_path: String,
}

impl UploadSlot {
    pub fn new(index: usize, local_path: impl Into<String>) -> Self {
        Self { index, local_path: local_path.into() }
    }

    /// Basename of the local path, used in log lines and error messages.
    pub fn file_name(&self) -> String {
        Path::new(&self.local_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.local_path.clone())
    }
}

/// Picks the present `img1..img8` inputs, in ascending slot order.
///
/// Only non-blank strings count as present, stored trimmed; any other value
/// type is ignored.
pub fn collect_slots(inputs: &Value) -> Vec<UploadSlot> {
    (1..=MAX_SLOTS)
        .filter_map(|i| {
            inputs.get(format!("img{}", i))
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| UploadSlot::new(i, s))
        })
        .collect()
}

/// Same as [`collect_slots`] but an empty batch is an error.
pub fn require_slots(inputs: &Value) -> Result<Vec<UploadSlot>> {
    let slots = collect_slots(inputs);
    if slots.is_empty() {
        return Err(UploadError::NoImagesProvided);
    }
    Ok(slots)
}

/// Outcome of uploading a single slot. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub index: usize,
    pub succeeded: bool,
    pub url: Option<String>,
    pub error_message: Option<String>,
}

impl UploadResult {
    pub fn success(index: usize, url: impl Into<String>) -> Self {
        Self { index, succeeded: true, url: Some(url.into()), error_message: None }
    }

    pub fn failure(index: usize, error_message: impl Into<String>) -> Self {
        Self { index, succeeded: false, url: None, error_message: Some(error_message.into()) }
    }
}

/// How the outbound record spells the `success` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessEncoding {
    Bool,
    /// `"true"` / `"false"`
    Text,
}

/// Aggregated record for a whole batch invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    urls: [String; MAX_SLOTS],
    pub overall_success: bool,
    pub error_message: String,
}

impl Default for BatchOutcome {
    fn default() -> Self {
        Self {
            urls: Default::default(),
            overall_success: true,
            error_message: String::new(),
        }
    }
}

impl BatchOutcome {
    /// All slots empty, marked failed.
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            urls: Default::default(),
            overall_success: false,
            error_message: error_message.into(),
        }
    }

    /// Folds results in order. The first failure wins the error message and
    /// nothing after it is looked at.
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = UploadResult>,
    {
        let mut outcome = Self::default();
        for result in results {
            if !outcome.record(result) {
                break;
            }
        }
        outcome
    }

    /// Applies one slot result; returns whether the batch is still healthy.
    pub fn record(&mut self, result: UploadResult) -> bool {
        if result.succeeded {
            if let Some(url) = result.url {
                self.set_url(result.index, url);
            }
            true
        } else {
            self.overall_success = false;
            self.error_message = result.error_message.unwrap_or_default();
            false
        }
    }

    fn set_url(&mut self, index: usize, url: String) {
        if (1..=MAX_SLOTS).contains(&index) {
            self.urls[index - 1] = url;
        }
    }

    /// URL for slot `index` (1-based); empty when the slot was absent or not
    /// uploaded.
    pub fn url(&self, index: usize) -> &str {
        if (1..=MAX_SLOTS).contains(&index) {
            &self.urls[index - 1]
        } else {
            ""
        }
    }

    pub fn urls(&self) -> &[String; MAX_SLOTS] {
        &self.urls
    }

    /// The record handed back to the workflow engine:
    /// `url1..url8`, `success`, `error_message`.
    pub fn to_output(&self, encoding: SuccessEncoding) -> Value {
        let mut out = Map::new();
        for (i, url) in self.urls.iter().enumerate() {
            out.insert(format!("url{}", i + 1), Value::String(url.clone()));
        }
        out.insert("success".to_string(), encode_success(self.overall_success, encoding));
        out.insert("error_message".to_string(), Value::String(self.error_message.clone()));
        Value::Object(out)
    }
}

fn encode_success(success: bool, encoding: SuccessEncoding) -> Value {
    match encoding {
        SuccessEncoding::Bool => json!(success),
        SuccessEncoding::Text => json!(if success { "true" } else { "false" }),
    }
}

/// Record produced by the single-image node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleOutcome {
    pub url: String,
    pub success: bool,
    pub error_message: String,
}

impl From<UploadResult> for SingleOutcome {
    fn from(result: UploadResult) -> Self {
        Self {
            url: result.url.unwrap_or_default(),
            success: result.succeeded,
            error_message: result.error_message.unwrap_or_default(),
        }
    }
}

impl SingleOutcome {
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self { url: String::new(), success: false, error_message: error_message.into() }
    }

    pub fn to_output(&self) -> Value {
        json!({
            "url": self.url,
            "success": self.success,
            "error_message": self.error_message,
        })
    }
}
