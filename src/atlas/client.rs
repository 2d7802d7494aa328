//! Atlas Client
//!
//! Entry point bundling the resource services over one shared transport.

use super::alerts::AlertsService;
use super::auth::DigestAuth;
use super::http::AtlasHttpClient;
use super::measurements::MeasurementsService;
use super::processes::ProcessesService;
use super::request::RequestDoer;
use crate::config::ClientConfig;
use crate::error::Result;
use std::sync::Arc;

/// Main Atlas client
#[derive(Clone)]
pub struct AtlasClient {
    pub alerts: AlertsService,
    pub measurements: MeasurementsService,
    pub processes: ProcessesService,
}

impl AtlasClient {
    /// Build a client on top of any request executor
    pub fn with_doer(doer: Arc<dyn RequestDoer>) -> Self {
        Self {
            alerts: AlertsService::new(doer.clone()),
            measurements: MeasurementsService::new(doer.clone()),
            processes: ProcessesService::new(doer),
        }
    }

    pub fn new(http: AtlasHttpClient) -> Self {
        Self::with_doer(Arc::new(http))
    }

    /// Create a digest-authenticated client from configuration
    pub fn connect(config: &ClientConfig, auth: DigestAuth) -> Result<Self> {
        let http = AtlasHttpClient::new(config)?.with_digest_auth(auth);
        Ok(Self::new(http))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::processes::ProcessesApi;
    use crate::atlas::request::mock::MockDoer;
    use crate::atlas::{AlertsApi, MeasurementsApi};
    use reqwest::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_services_share_one_transport() {
        let doer = Arc::new(
            MockDoer::new()
                .reply(StatusCode::OK, json!({"results": [{"hostname": "h1", "port": 27017}]}))
                .reply(StatusCode::OK, json!({"measurements": []}))
                .reply(StatusCode::OK, json!({"results": []})),
        );
        let client = AtlasClient::with_doer(doer.clone());

        let (processes, _) = client.processes.list("g1", None).await.unwrap();
        let process = &processes[0];
        client
            .measurements
            .list("g1", &process.hostname, process.port, None)
            .await
            .unwrap();
        client.alerts.list("g1", None).await.unwrap();

        assert_eq!(
            doer.paths(),
            vec![
                "groups/g1/processes",
                "groups/g1/processes/h1:27017/measurements?granularity=PT24H&period=PT24H",
                "groups/g1/alerts",
            ]
        );
    }

    #[test]
    fn test_connect_rejects_bad_base_url() {
        let config = ClientConfig {
            base_url: "::not-a-url".to_string(),
            ..Default::default()
        };
        assert!(AtlasClient::connect(&config, DigestAuth::new("public", "private")).is_err());
    }
}
