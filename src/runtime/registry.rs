use std::sync::Arc;
use dashmap::DashMap;
use uuid::Uuid;
use anyhow::{Result, anyhow};
use serde_json::Value;
use tracing::{info, error};
use crate::actions::FunctionHandler;
use crate::runtime::context::Context;
use crate::runtime::logger::{WorkflowLogger, TracingLogger};

/// Name -> handler table the host engine dispatches through.
#[derive(Default)]
pub struct NodeRegistry {
    handlers: DashMap<String, Arc<dyn FunctionHandler>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }

    pub fn register_function(&self, handler: Arc<dyn FunctionHandler>) {
        let name = handler.name().to_string();
        if self.handlers.insert(name.clone(), handler).is_some() {
            info!(node = %name, "Replaced previously registered node");
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn FunctionHandler>> {
        self.handlers.get(name).map(|h| h.value().clone())
    }

    /// Registered node names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Runs one node with the given inputs.
    ///
    /// Only an unknown node or inputs rejected by `validate` come back as
    /// `Err`; upload failures are part of the returned record.
    pub async fn invoke(&self, name: &str, inputs: Value, logger: Option<Arc<dyn WorkflowLogger>>) -> Result<Value> {
        // Clone the Arc out so no map guard lives across the await.
        let handler = self.get(name)
            .ok_or_else(|| anyhow!("Node definition not found: {}", name))?;

        handler.validate(&inputs)?;

        let instance_id = Uuid::new_v4();
        let logger = logger.unwrap_or_else(|| Arc::new(TracingLogger::new(instance_id, name)) as Arc<dyn WorkflowLogger>);
        let ctx = Context::new(instance_id, name, logger);

        info!(instance_id = %instance_id, node = %name, "Invoking node");
        let output = handler.execute(inputs, &ctx).await;
        if let Err(e) = &output {
            error!(instance_id = %instance_id, node = %name, error = ?e, "Node failed");
        }
        output
    }
}
