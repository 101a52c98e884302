pub mod actions;
pub mod config;
pub mod error;
pub mod gitee;
pub mod postimage;
pub mod runtime;
pub mod upload;

use std::sync::Arc;
use anyhow::Result;
use crate::actions::gitee::{GiteeImageUploaderAction, GiteeSingleImageAction};
use crate::actions::postimage::PostImageUploaderAction;
use crate::config::{ApiKeyProvider, AppConfig};
use crate::postimage::driver::ChromiumFormDriver;
use crate::runtime::registry::NodeRegistry;

/// Registry with every upload node this crate ships.
///
/// Credentials are resolved here, once; a missing Gitee token is an error
/// before any node runs.
pub fn standard_registry(config: &AppConfig, keys: &dyn ApiKeyProvider) -> Result<NodeRegistry> {
    let registry = NodeRegistry::new();
    registry.register_function(Arc::new(GiteeImageUploaderAction::new(config, keys)?));
    registry.register_function(Arc::new(GiteeSingleImageAction::new(config, keys)?));
    registry.register_function(Arc::new(PostImageUploaderAction::new(
        ChromiumFormDriver::new(&config.postimage, &config.browser),
    )));
    Ok(registry)
}
