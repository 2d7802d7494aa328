//! Error types for Atlas API calls

use crate::atlas::response::Response;
use serde::Deserialize;
use thiserror::Error;

/// Error body returned by the Atlas API on non-success statuses
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// HTTP status code echoed by the server
    #[serde(default, rename = "error")]
    pub http_code: Option<u16>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    /// Values substituted into `detail`; Atlas sends `null` when there are none
    #[serde(default)]
    pub parameters: Option<Vec<serde_json::Value>>,
}

/// Everything that can go wrong while talking to Atlas
#[derive(Debug, Error)]
pub enum AtlasError {
    /// A required identifier or payload was empty or absent; no request was sent
    #[error("{name}: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Digest authentication failed: {0}")]
    Auth(String),

    /// The server answered with a non-success status
    #[error("API request failed: {}", describe(.response, .body))]
    Api {
        response: Response,
        body: Option<ApiErrorBody>,
    },

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AtlasError {
    pub(crate) fn must_be_set(name: &'static str) -> Self {
        AtlasError::InvalidArgument {
            name,
            reason: "must be set",
        }
    }

    /// Response metadata attached to the error, if the server was reached
    pub fn response(&self) -> Option<&Response> {
        match self {
            AtlasError::Api { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Atlas error code (e.g. `ALERT_NOT_FOUND`) when the error body carried one
    pub fn error_code(&self) -> Option<&str> {
        match self {
            AtlasError::Api { body: Some(body), .. } => body.error_code.as_deref(),
            _ => None,
        }
    }
}

fn describe(response: &Response, body: &Option<ApiErrorBody>) -> String {
    let Some(body) = body else {
        return response.status.to_string();
    };
    match (&body.error_code, &body.detail) {
        (Some(code), Some(detail)) => format!("{} ({}) {}", response.status, code, detail),
        (Some(code), None) => format!("{} ({})", response.status, code),
        (None, Some(detail)) => format!("{} {}", response.status, detail),
        (None, None) => response.status.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;
