use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Small `{type, msg}` envelope shared by status messages and errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, String>>,
}

impl GenericResponse {
    pub fn msg(msg: impl Into<String>) -> Self {
        Self {
            kind: "msg".to_string(),
            msg: msg.into(),
            errors: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            kind: "error".to_string(),
            msg: msg.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: HashMap<String, String>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse<T> {
    pub results: usize,
    pub page: i64,
    pub data: Vec<T>,
}

impl<T> ResourceResponse<T> {
    pub fn new(data: Vec<T>, page: i64) -> Self {
        Self {
            results: data.len(),
            page,
            data,
        }
    }
}
