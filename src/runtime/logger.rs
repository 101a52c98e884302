use std::fmt::Debug;
use std::sync::Mutex;
use uuid::Uuid;
use tracing::{info, error};

/// 工作流日志接口：引擎为每次调用注入
pub trait WorkflowLogger: Send + Sync + Debug {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to `tracing`, tagged with the invocation it belongs to.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    instance_id: Uuid,
    node: String,
}

impl TracingLogger {
    pub fn new(instance_id: Uuid, node: impl Into<String>) -> Self {
        Self { instance_id, node: node.into() }
    }
}

impl WorkflowLogger for TracingLogger {
    fn info(&self, message: &str) {
        info!(instance_id = %self.instance_id, node = %self.node, "{}", message);
    }

    fn error(&self, message: &str) {
        error!(instance_id = %self.instance_id, node = %self.node, "{}", message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// Keeps every line in memory. Handy when the host wants the log attached to
/// the node's run record instead of the process log.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((level, message.to_string()));
        }
    }
}

impl WorkflowLogger for MemoryLogger {
    fn info(&self, message: &str) {
        info!("{}", message);
        self.push(LogLevel::Info, message);
    }

    fn error(&self, message: &str) {
        error!("{}", message);
        self.push(LogLevel::Error, message);
    }
}
