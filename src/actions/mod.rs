use async_trait::async_trait;
use serde_json::Value;
use crate::runtime::context::Context;
use anyhow::{Result, anyhow};
use std::fmt::Debug;

pub mod gitee;
pub mod postimage;

/// 插件接口：所有功能节点必须实现此 Trait
#[async_trait]
pub trait FunctionHandler: Send + Sync + Debug {
    fn name(&self) -> &str;
    fn description(&self) -> &str {
        ""
    }
    fn validate(&self, params: &Value) -> Result<()>;
    async fn execute(&self, params: Value, ctx: &Context) -> Result<Value>;
}

/// Node inputs arrive as an object of named strings. Any of `keys` that is
/// present must be a string.
pub fn validate_string_inputs(params: &Value, keys: &[&str]) -> Result<()> {
    let obj = params.as_object()
        .ok_or_else(|| anyhow!("Node inputs must be an object"))?;
    for key in keys {
        match obj.get(*key) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => return Err(anyhow!("Input {} must be a string, got {}", key, other)),
        }
    }
    Ok(())
}

pub(crate) const IMAGE_INPUTS: [&str; 8] = ["img1", "img2", "img3", "img4", "img5", "img6", "img7", "img8"];
