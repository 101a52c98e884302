use async_trait::async_trait;
use serde_json::Value;
use anyhow::Result;
use std::sync::Arc;
use crate::actions::{FunctionHandler, IMAGE_INPUTS, validate_string_inputs};
use crate::postimage::batch::upload_batch;
use crate::postimage::driver::{ChromiumFormDriver, UploadFormDriver};
use crate::runtime::context::Context;
use crate::upload::SuccessEncoding;

/// `postimage_uploader`: up to eight images through the PostImage web form.
///
/// Outputs `url1..url8`, `success` (`"true"`/`"false"`), `error_message`.
pub struct PostImageUploaderAction {
    driver: Arc<dyn UploadFormDriver>,
}

impl std::fmt::Debug for PostImageUploaderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostImageUploaderAction").finish_non_exhaustive()
    }
}

impl PostImageUploaderAction {
    pub fn new(driver: ChromiumFormDriver) -> Self {
        Self { driver: Arc::new(driver) }
    }

    pub fn with_driver(driver: Arc<dyn UploadFormDriver>) -> Self {
        Self { driver }
    }
}

#[async_trait]
impl FunctionHandler for PostImageUploaderAction {
    fn name(&self) -> &str {
        "postimage_uploader"
    }

    fn description(&self) -> &str {
        "Upload multiple images (up to 8) to PostImage and get their download URLs"
    }

    fn validate(&self, params: &Value) -> Result<()> {
        validate_string_inputs(params, &IMAGE_INPUTS)
    }

    async fn execute(&self, params: Value, ctx: &Context) -> Result<Value> {
        let outcome = upload_batch(&params, self.driver.as_ref(), ctx.logger()).await;
        Ok(outcome.to_output(SuccessEncoding::Text))
    }
}
