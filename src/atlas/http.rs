//! HTTP transport for Atlas REST API calls

use super::auth::DigestAuth;
use super::request::{check_response, ApiRequest, RawResponse, RequestDoer};
use crate::config::ClientConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// reqwest-backed [`RequestDoer`] talking to the Atlas API
#[derive(Clone)]
pub struct AtlasHttpClient {
    client: Client,
    base_url: Url,
    auth: Option<DigestAuth>,
}

impl AtlasHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url()?,
            auth: None,
        })
    }

    /// Answer digest challenges with the given credentials
    pub fn with_digest_auth(mut self, auth: DigestAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl RequestDoer for AtlasHttpClient {
    fn new_request(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiRequest> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        Ok(ApiRequest { method, url, body })
    }

    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        tracing::debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method, request.url)
            .header(ACCEPT, "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let http_request = builder.build()?;
        let response = match &self.auth {
            Some(auth) => auth.execute(&self.client, http_request).await?,
            None => self.client.execute(http_request).await?,
        };

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::debug!("API error: {} - {}", status, sanitize_for_log(&body));
        }

        check_response(status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.ends_with("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("a\nb\tc d"), "abc d");
    }

    #[test]
    fn test_new_request_resolves_against_base_url() {
        let config = ClientConfig {
            base_url: "https://cloud.mongodb.com/api/atlas/v1.0".to_string(),
            ..Default::default()
        };
        let client = AtlasHttpClient::new(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "https://cloud.mongodb.com/api/atlas/v1.0/");

        let request = client
            .new_request(Method::GET, "groups/g1/processes/host1:27017/measurements?granularity=PT24H", None)
            .unwrap();

        assert_eq!(
            request.url.as_str(),
            "https://cloud.mongodb.com/api/atlas/v1.0/groups/g1/processes/host1:27017/measurements?granularity=PT24H"
        );
        assert_eq!(request.method, Method::GET);
    }
}
