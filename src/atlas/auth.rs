//! Atlas Authentication
//!
//! The Atlas API authenticates programmatic API keys with HTTP digest
//! authentication: the public key is the username, the private key the
//! password. Challenges are answered with `digest_auth`.

use crate::error::{AtlasError, Result};
use digest_auth::{AuthContext, HttpMethod, WwwAuthenticateHeader};
use reqwest::header::{HeaderValue, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Client, Request, StatusCode};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Environment variable holding the API public key
pub const PUBLIC_KEY_ENV: &str = "MONGODB_ATLAS_PUBLIC_KEY";
/// Environment variable holding the API private key
pub const PRIVATE_KEY_ENV: &str = "MONGODB_ATLAS_PRIVATE_KEY";

/// Digest credentials with a cached server challenge
#[derive(Clone)]
pub struct DigestAuth {
    public_key: String,
    private_key: String,
    /// Last challenge seen; answering it again bumps the nonce count
    challenge: Arc<RwLock<Option<WwwAuthenticateHeader>>>,
}

impl fmt::Debug for DigestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestAuth")
            .field("public_key", &self.public_key)
            .field("private_key", &"[redacted]")
            .finish()
    }
}

impl DigestAuth {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            challenge: Arc::new(RwLock::new(None)),
        }
    }

    /// Read the key pair from the environment; `None` if either is unset or empty
    pub fn from_env() -> Option<Self> {
        let public_key = std::env::var(PUBLIC_KEY_ENV).ok().filter(|v| !v.is_empty())?;
        let private_key = std::env::var(PRIVATE_KEY_ENV).ok().filter(|v| !v.is_empty())?;
        Some(Self::new(public_key, private_key))
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Send `request`, answering a digest challenge once if the server asks for one
    pub async fn execute(&self, client: &Client, mut request: Request) -> Result<reqwest::Response> {
        // Keep a copy for the challenge round trip; streaming bodies cannot be replayed
        let retry = request.try_clone();
        let target = DigestTarget::of(&request);

        if let Some(header) = self.authorization_for(&target).await? {
            request.headers_mut().insert(AUTHORIZATION, header);
        }

        let response = client.execute(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(mut retry) = retry else {
            return Ok(response);
        };
        let Some(challenge) = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.trim_start().starts_with("Digest"))
        else {
            return Ok(response);
        };

        let prompt = digest_auth::parse(challenge).map_err(|e| AtlasError::Auth(e.to_string()))?;
        tracing::debug!("Answering digest challenge for {}", retry.url());

        {
            let mut cache = self.challenge.write().await;
            *cache = Some(prompt);
        }

        if let Some(header) = self.authorization_for(&target).await? {
            retry.headers_mut().insert(AUTHORIZATION, header);
        }

        Ok(client.execute(retry).await?)
    }

    /// Authorization header answering the cached challenge, if there is one
    async fn authorization_for(&self, target: &DigestTarget) -> Result<Option<HeaderValue>> {
        let mut cache = self.challenge.write().await;
        let Some(prompt) = cache.as_mut() else {
            return Ok(None);
        };

        let context = AuthContext::new_with_method(
            self.public_key.as_str(),
            self.private_key.as_str(),
            target.uri.as_str(),
            target.body.as_deref(),
            HttpMethod::from(target.method.as_str()),
        );

        let answer = prompt
            .respond(&context)
            .map_err(|e| AtlasError::Auth(e.to_string()))?;

        HeaderValue::from_str(&answer.to_header_string())
            .map(Some)
            .map_err(|e| AtlasError::Auth(e.to_string()))
    }
}

/// The parts of a request that enter the digest response hash
struct DigestTarget {
    method: String,
    /// Path and query, as sent on the request line
    uri: String,
    body: Option<Vec<u8>>,
}

impl DigestTarget {
    fn of(request: &Request) -> Self {
        let url = request.url();
        let uri = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        Self {
            method: request.method().as_str().to_string(),
            uri,
            body: request.body().and_then(|b| b.as_bytes()).map(|b| b.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHALLENGE: &str = r#"Digest realm="MMS Public API", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", algorithm=MD5, qop="auth", stale=false"#;

    #[test]
    fn test_debug_redacts_private_key() {
        let auth = DigestAuth::new("public", "very-secret");
        let debug = format!("{:?}", auth);
        assert!(debug.contains("public"));
        assert!(!debug.contains("very-secret"));
    }

    #[tokio::test]
    async fn test_no_header_before_first_challenge() {
        let auth = DigestAuth::new("public", "private");
        let request = Client::new()
            .get("https://cloud.mongodb.com/api/atlas/v1.0/groups/g1/processes")
            .build()
            .unwrap();

        let target = DigestTarget::of(&request);
        assert!(auth.authorization_for(&target).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cached_challenge_is_answered() {
        let auth = DigestAuth::new("public", "private");
        *auth.challenge.write().await = Some(digest_auth::parse(CHALLENGE).unwrap());

        let request = Client::new()
            .get("https://cloud.mongodb.com/api/atlas/v1.0/groups/g1/alerts?pageNum=2")
            .build()
            .unwrap();
        let target = DigestTarget::of(&request);
        assert_eq!(target.uri, "/api/atlas/v1.0/groups/g1/alerts?pageNum=2");

        let header = auth.authorization_for(&target).await.unwrap().unwrap();
        let header = header.to_str().unwrap();

        assert!(header.starts_with("Digest "));
        assert!(header.contains(r#"username="public""#));
        assert!(header.contains(r#"uri="/api/atlas/v1.0/groups/g1/alerts?pageNum=2""#));
        assert!(!header.contains("private"));
    }
}
