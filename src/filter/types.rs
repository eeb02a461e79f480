use serde_json::Value;

/// Parameterised SQL produced by a [`super::Filter`]; `params` bind in order as `$1..$n`.
#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
