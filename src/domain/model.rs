use crate::utils::error::{ConnectorError, ErrorCategory, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Remote actions supported against a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetMenu,
    UpdateItems,
    UpdateInventory,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetMenu => "getMenu",
            Operation::UpdateItems => "updateItems",
            Operation::UpdateInventory => "updateInventory",
        }
    }
}

impl FromStr for Operation {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "getMenu" => Ok(Operation::GetMenu),
            "updateItems" => Ok(Operation::UpdateItems),
            "updateInventory" => Ok(Operation::UpdateInventory),
            other => Err(ConnectorError::UnsupportedOperationError {
                operation: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// The `data` parameter of a record: either structured JSON or a JSON-encoded string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Raw(String),
    Json(Value),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Json(serde_json::json!({ "data": [] }))
    }
}

impl Payload {
    /// 轉成請求 body；字串在這裡才解析
    pub fn to_body(&self) -> Result<Value> {
        match self {
            Payload::Json(value) => Ok(value.clone()),
            Payload::Raw(text) => {
                serde_json::from_str(text).map_err(|e| ConnectorError::InvalidPayloadError {
                    message: e.to_string(),
                })
            }
        }
    }
}

fn default_operation() -> String {
    Operation::UpdateItems.as_str().to_string()
}

/// One input record from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRequest {
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(rename = "venueId")]
    pub venue_id: String,
    #[serde(default)]
    pub data: Payload,
}

impl OperationRequest {
    pub fn new(operation: impl Into<String>, venue_id: impl Into<String>, data: Payload) -> Self {
        Self {
            operation: operation.into(),
            venue_id: venue_id.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// Structured basic auth handed to the transport instead of a prebuilt header.
    pub basic_auth: Option<(String, String)>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordError {
    pub category: ErrorCategory,
    pub message: String,
}

/// One output record, positionally matching its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub json: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RecordError>,
}

impl ResultRecord {
    pub fn success(json: Value) -> Self {
        Self { json, error: None }
    }

    pub fn failure(err: &ConnectorError) -> Self {
        let message = err.to_string();
        Self {
            json: serde_json::json!({ "error": message }),
            error: Some(RecordError {
                category: err.category(),
                message,
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
