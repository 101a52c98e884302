use std::fmt;
use async_trait::async_trait;
use serde_json::Value;
use anyhow::Result;
use crate::actions::{FunctionHandler, IMAGE_INPUTS, validate_string_inputs};
use crate::config::{ApiKeyProvider, AppConfig, GITEE_PROVIDER, GITEE_TOKEN_KEY, require_api_key};
use crate::gitee::batch::{upload_batch, upload_single};
use crate::gitee::client::GiteeUploader;
use crate::runtime::context::Context;
use crate::upload::SuccessEncoding;

/// Credential and endpoint shared by both Gitee nodes.
#[derive(Clone)]
struct GiteeEndpoint {
    access_token: String,
    api_base: String,
}

impl GiteeEndpoint {
    fn resolve(config: &AppConfig, keys: &dyn ApiKeyProvider) -> Result<Self> {
        Ok(Self {
            access_token: require_api_key(keys, GITEE_PROVIDER, GITEE_TOKEN_KEY)?,
            api_base: config.gitee.api_base.clone(),
        })
    }

    /// One HTTP session per invocation.
    fn connect(&self) -> GiteeUploader {
        GiteeUploader::with_api_base(self.access_token.clone(), self.api_base.clone())
    }
}

impl fmt::Debug for GiteeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GiteeEndpoint")
            .field("access_token", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// `gitee_image_uploader`: up to eight images into a Gitee repository.
///
/// Inputs `img1..img8`, `repo_url`; outputs `url1..url8`, `success` (bool),
/// `error_message`.
#[derive(Debug, Clone)]
pub struct GiteeImageUploaderAction {
    endpoint: GiteeEndpoint,
}

impl GiteeImageUploaderAction {
    /// Fails when no access token is configured for `gitee.com`.
    pub fn new(config: &AppConfig, keys: &dyn ApiKeyProvider) -> Result<Self> {
        Ok(Self { endpoint: GiteeEndpoint::resolve(config, keys)? })
    }
}

#[async_trait]
impl FunctionHandler for GiteeImageUploaderAction {
    fn name(&self) -> &str {
        "gitee_image_uploader"
    }

    fn description(&self) -> &str {
        "Upload multiple images (up to 8) to Gitee repository and get their download URLs"
    }

    fn validate(&self, params: &Value) -> Result<()> {
        validate_string_inputs(params, &IMAGE_INPUTS)?;
        validate_string_inputs(params, &["repo_url"])
    }

    async fn execute(&self, params: Value, ctx: &Context) -> Result<Value> {
        let outcome = upload_batch(&params, ctx.logger(), || self.endpoint.connect()).await;
        Ok(outcome.to_output(SuccessEncoding::Bool))
    }
}

/// `gitee_single_image_uploader`: inputs `img`, `repo_url`; outputs `url`,
/// `success`, `error_message`.
#[derive(Debug, Clone)]
pub struct GiteeSingleImageAction {
    endpoint: GiteeEndpoint,
}

impl GiteeSingleImageAction {
    pub fn new(config: &AppConfig, keys: &dyn ApiKeyProvider) -> Result<Self> {
        Ok(Self { endpoint: GiteeEndpoint::resolve(config, keys)? })
    }
}

#[async_trait]
impl FunctionHandler for GiteeSingleImageAction {
    fn name(&self) -> &str {
        "gitee_single_image_uploader"
    }

    fn description(&self) -> &str {
        "Upload one image to Gitee repository and get its download URL"
    }

    fn validate(&self, params: &Value) -> Result<()> {
        validate_string_inputs(params, &["img", "repo_url"])
    }

    async fn execute(&self, params: Value, ctx: &Context) -> Result<Value> {
        let outcome = upload_single(&params, ctx.logger(), || self.endpoint.connect()).await;
        Ok(outcome.to_output())
    }
}
