//! Batch operation and response types

use crate::core::models::LineItemKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Maximum number of inner operations the platform accepts per batch call
pub const MAX_BATCH_SIZE: usize = 500;

/// HTTP method of an inner batch request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical inner request of a batch call.
///
/// Immutable once built. It carries no identity of its own: the line item it
/// concerns is always derived from its URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOperation {
    method: HttpMethod,
    url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl BatchOperation {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            payload: None,
        }
    }

    pub fn with_payload(method: HttpMethod, url: impl Into<String>, payload: Value) -> Self {
        Self {
            method,
            url: url.into(),
            payload: Some(payload),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Line item this operation targets, derived from its URL
    pub fn key(&self) -> Option<LineItemKey> {
        LineItemKey::from_resource_path(&self.url)
    }
}

/// Error envelope of one inner response.
///
/// The platform does not echo the originating request, so all that is left
/// is the code, the message and whatever path text the message happens to
/// mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItemError {
    pub code: Option<i64>,
    pub message: String,
    pub status: Option<String>,
    pub raw: Value,
}

impl BatchItemError {
    /// Read an `{"error": {...}}` object
    pub fn from_value(value: Value) -> Self {
        let error = value.get("error");
        let code = error.and_then(|e| e.get("code")).and_then(Value::as_i64);
        let message = match error {
            Some(Value::String(text)) => text.clone(),
            Some(e) => e
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            None => String::new(),
        };
        let status = error
            .and_then(|e| e.get("status"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            code,
            message,
            status,
            raw: value,
        }
    }

    /// Code as rendered in failure records
    pub fn code_text(&self) -> String {
        match (&self.code, &self.status) {
            (Some(code), _) => code.to_string(),
            (None, Some(status)) => status.clone(),
            (None, None) => "UNKNOWN".to_string(),
        }
    }

    /// Line item named anywhere in the error, if any
    pub fn line_item_key(&self) -> Option<LineItemKey> {
        LineItemKey::from_resource_path(&self.message)
            .or_else(|| LineItemKey::from_resource_path(&self.raw.to_string()))
    }
}

/// One decoded inner response
#[derive(Debug, Clone, PartialEq)]
pub enum BatchResponseItem {
    Success(Value),
    Error(BatchItemError),
}

impl BatchResponseItem {
    /// Classify a decoded JSON object by the presence of an `error` field
    pub fn classify(value: Value) -> Self {
        if value.get("error").is_some() {
            Self::Error(BatchItemError::from_value(value))
        } else {
            Self::Success(value)
        }
    }
}

/// Classified result of one batch call, in response order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub success: Vec<Value>,
    pub errors: Vec<BatchItemError>,
}

impl BatchOutcome {
    pub fn push(&mut self, item: BatchResponseItem) {
        match item {
            BatchResponseItem::Success(value) => self.success.push(value),
            BatchResponseItem::Error(error) => self.errors.push(error),
        }
    }

    pub fn len(&self) -> usize {
        self.success.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl FromIterator<BatchResponseItem> for BatchOutcome {
    fn from_iter<I: IntoIterator<Item = BatchResponseItem>>(iter: I) -> Self {
        let mut outcome = Self::default();
        for item in iter {
            outcome.push(item);
        }
        outcome
    }
}
