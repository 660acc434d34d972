//! JSON bodies of the `/predict` endpoint.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::WireError;
use crate::action::Action;

/// Body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictRequest {
    /// Free-form prompt, answered with the agent's raw text
    Prompt { prompt: String },
    /// Comma-joined action names plus an optional base64 screenshot
    Actions {
        valid_actions: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
}

impl PredictRequest {
    /// Parse a request body, naming what is missing when it is unusable
    pub fn parse(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Err(WireError::EmptyMessage.into());
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|e| WireError::InvalidFormat(format!("invalid JSON: {e}")))?;

        let Some(fields) = value.as_object() else {
            return Err(WireError::InvalidFormat("expected a JSON object".to_string()).into());
        };

        if !fields.contains_key("prompt") && !fields.contains_key("valid_actions") {
            return Err(WireError::MissingField("prompt".to_string()).into());
        }

        let request = serde_json::from_value(value)
            .map_err(|e| WireError::InvalidFormat(format!("malformed request: {e}")))?;

        Ok(request)
    }
}

/// Body returned by `/predict`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Error { error: String },
    Action { action: Option<String> },
}

impl PredictResponse {
    pub fn action(action: impl Into<String>) -> Self {
        Self::Action {
            action: Some(action.into()),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }
}

/// Parse a comma-joined action list. An empty list means every action.
pub fn parse_valid_actions<A: Action>(list: &str) -> Result<Vec<A>, WireError> {
    let names: Vec<&str> = list
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        return Ok(A::ALL.to_vec());
    }

    names
        .into_iter()
        .map(|name| A::from_name(name).ok_or_else(|| WireError::UnknownAction(name.to_string())))
        .collect()
}
