use std::sync::Arc;
use uuid::Uuid;
use crate::runtime::logger::{WorkflowLogger, TracingLogger};

/// 运行时上下文 (Runtime Context)
/// 一次节点调用的全部环境：调用 ID、节点名和日志
#[derive(Debug, Clone)] // Context should be cheap to clone (just Arcs)
pub struct Context {
    pub instance_id: Uuid,
    pub node: String,
    pub logger: Arc<dyn WorkflowLogger>,
}

impl Context {
    pub fn new(instance_id: Uuid, node: impl Into<String>, logger: Arc<dyn WorkflowLogger>) -> Self {
        Self {
            instance_id,
            node: node.into(),
            logger,
        }
    }

    /// Fresh invocation logging straight to `tracing`.
    pub fn for_node(node: &str) -> Self {
        let instance_id = Uuid::new_v4();
        Self::new(instance_id, node, Arc::new(TracingLogger::new(instance_id, node)))
    }

    pub fn logger(&self) -> &dyn WorkflowLogger {
        self.logger.as_ref()
    }
}
