use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use crate::config::DEFAULT_GITEE_API_BASE;
use crate::error::{Result, UploadError};
use crate::runtime::logger::WorkflowLogger;
use crate::upload::{UploadResult, UploadSlot};
use crate::upload::locator::RepositoryLocator;
use crate::upload::path::timestamped_filename;

/// Branch every upload is committed to.
pub const TARGET_BRANCH: &str = "master";

/// Pushes one slot's file to a repository and reports the public URL.
///
/// Implementations turn every failure into a failed [`UploadResult`]; they do
/// not return errors.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(
        &self,
        slot: &UploadSlot,
        repo: &RepositoryLocator,
        target_dir: &str,
        logger: &dyn WorkflowLogger,
    ) -> UploadResult;
}

#[derive(Debug, Serialize)]
struct CreateFileRequest<'a> {
    access_token: &'a str,
    content: String,
    branch: &'a str,
    message: String,
}

/// Gitee "create file" client. One instance is one HTTP session; the
/// underlying connection pool is reused for every upload of a batch.
#[derive(Debug, Clone)]
pub struct GiteeUploader {
    client: Client,
    api_base: String,
    access_token: String,
}

impl GiteeUploader {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_api_base(access_token, DEFAULT_GITEE_API_BASE)
    }

    pub fn with_api_base(access_token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn contents_url(&self, repo: &RepositoryLocator, target_dir: &str, filename: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}/{}",
            self.api_base, repo.owner, repo.repo, target_dir, filename
        )
    }

    /// Returns the stored filename and its download URL.
    async fn create_file(&self, slot: &UploadSlot, repo: &RepositoryLocator, target_dir: &str) -> Result<(String, String)> {
        let bytes = tokio::fs::read(&slot.local_path).await
            .map_err(|source| UploadError::FileRead { path: slot.local_path.clone(), source })?;

        let original = slot.file_name();
        let filename = timestamped_filename(&original);

        let payload = CreateFileRequest {
            access_token: &self.access_token,
            content: STANDARD.encode(&bytes),
            branch: TARGET_BRANCH,
            message: format!("Upload image: {} (original: {})", filename, original),
        };

        let response = self.client
            .post(self.contents_url(repo, target_dir, &filename))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(UploadError::ApiRequest { status: status.as_u16(), body });
        }

        let url = download_url(&body)?;
        Ok((filename, url))
    }
}

/// Pulls `content.download_url` out of a create-file response body.
pub fn download_url(body: &str) -> Result<String> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|_| UploadError::MalformedApiResponse(body.to_string()))?;
    parsed.pointer("/content/download_url")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| UploadError::MalformedApiResponse(body.to_string()))
}

#[async_trait]
impl ImageUploader for GiteeUploader {
    async fn upload(
        &self,
        slot: &UploadSlot,
        repo: &RepositoryLocator,
        target_dir: &str,
        logger: &dyn WorkflowLogger,
    ) -> UploadResult {
        match self.create_file(slot, repo, target_dir).await {
            Ok((filename, url)) => {
                logger.info(&format!("Successfully uploaded image {}: {}", slot.index, filename));
                UploadResult::success(slot.index, url)
            }
            Err(e) => {
                let msg = format!("Failed to upload image {} ({}): {}", slot.index, slot.file_name(), e);
                logger.error(&msg);
                UploadResult::failure(slot.index, msg)
            }
        }
    }
}
