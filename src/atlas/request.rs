//! Request-execution capability shared by every resource service

use super::response::Response;
use crate::error::{ApiErrorBody, AtlasError, Result};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// A request resolved against the API base URL, ready to be executed
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

/// Raw body of a successful call plus its metadata
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub response: Response,
    pub body: String,
}

/// Builds and executes Atlas API requests
///
/// Services only depend on this trait, so any transport (or a test double)
/// can stand in for [`super::http::AtlasHttpClient`].
#[async_trait]
pub trait RequestDoer: Send + Sync {
    /// Resolve `path` (relative to the API base URL) into a request
    fn new_request(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiRequest>;

    /// Send the request; non-success statuses come back as [`AtlasError::Api`]
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Turn a status and body into a [`RawResponse`] or an API error
pub fn check_response(status: StatusCode, body: String) -> Result<RawResponse> {
    let response = Response::new(status);

    if !status.is_success() {
        let error_body = serde_json::from_str::<ApiErrorBody>(&body).ok();
        return Err(AtlasError::Api {
            response,
            body: error_body,
        });
    }

    Ok(RawResponse { response, body })
}

/// Build, execute and decode a single call
pub(crate) async fn send<T: DeserializeOwned>(
    doer: &dyn RequestDoer,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> Result<(T, Response)> {
    let request = doer.new_request(method, path, body)?;
    let raw = doer.execute(request).await?;

    // Handle empty response
    let value = if raw.body.trim().is_empty() {
        serde_json::from_value(Value::Null)?
    } else {
        serde_json::from_str(&raw.body)?
    };

    Ok((value, raw.response))
}

/// Reject identifiers that cannot stand as a single path segment
///
/// `.` and `..` survive percent-encoding unchanged and would be resolved
/// against the base URL, so they never reach [`segment`].
pub(crate) fn require_segment(name: &'static str, value: &str) -> Result<()> {
    match value {
        "" => Err(AtlasError::must_be_set(name)),
        "." | ".." => Err(AtlasError::InvalidArgument {
            name,
            reason: "must not be a dot segment",
        }),
        _ => Ok(()),
    }
}

/// Percent-encode one path segment
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
