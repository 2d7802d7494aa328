//! Atlas Process Measurements
//!
//! Metric time series for a single `host:port` process.

use super::options::{set_list_options, ListOptions};
use super::request::{require_segment, segment, send, RequestDoer};
use super::response::{ListEnvelope, Response};
use crate::error::{AtlasError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Measurement operations
#[async_trait]
pub trait MeasurementsApi: Send + Sync {
    /// Measurements of one process over the default 24 hour window
    async fn list(
        &self,
        group_id: &str,
        host: &str,
        port: u16,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Measurement>, Response)>;

    /// Measurements of one process over a caller-chosen window
    async fn list_with_window(
        &self,
        group_id: &str,
        host: &str,
        port: u16,
        window: &MeasurementWindow,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Measurement>, Response)>;
}

/// Sampling interval and look-back period, both ISO-8601 durations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementWindow {
    pub granularity: String,
    pub period: String,
}

impl Default for MeasurementWindow {
    fn default() -> Self {
        Self {
            granularity: "PT24H".to_string(),
            period: "PT24H".to_string(),
        }
    }
}

/// One sample of a measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub timestamp: String,
    /// `None` where Atlas has no sample for the interval
    pub value: Option<f64>,
}

impl Datapoint {
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A named metric time series, datapoints in chronological order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default, rename = "dataPoints")]
    pub datapoints: Vec<Datapoint>,
}

fn measurements_path(group_id: &str, host: &str, port: u16, window: &MeasurementWindow) -> String {
    format!(
        "groups/{}/processes/{}:{}/measurements?granularity={}&period={}",
        segment(group_id),
        segment(host),
        port,
        segment(&window.granularity),
        segment(&window.period),
    )
}

/// [`MeasurementsApi`] backed by a [`RequestDoer`]
#[derive(Clone)]
pub struct MeasurementsService {
    client: Arc<dyn RequestDoer>,
}

impl MeasurementsService {
    pub fn new(client: Arc<dyn RequestDoer>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MeasurementsApi for MeasurementsService {
    async fn list(
        &self,
        group_id: &str,
        host: &str,
        port: u16,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Measurement>, Response)> {
        self.list_with_window(group_id, host, port, &MeasurementWindow::default(), options)
            .await
    }

    async fn list_with_window(
        &self,
        group_id: &str,
        host: &str,
        port: u16,
        window: &MeasurementWindow,
        options: Option<&ListOptions>,
    ) -> Result<(Vec<Measurement>, Response)> {
        require_segment("group_id", group_id)?;
        require_segment("host", host)?;
        if port == 0 {
            return Err(AtlasError::must_be_set("port"));
        }

        let path = set_list_options(&measurements_path(group_id, host, port, window), options);
        let (envelope, response): (ListEnvelope<Measurement>, _) =
            send(self.client.as_ref(), Method::GET, &path, None).await?;

        Ok(envelope.unwrap_into(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::request::mock::MockDoer;
    use proptest::prelude::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn service(doer: MockDoer) -> (MeasurementsService, Arc<MockDoer>) {
        let doer = Arc::new(doer);
        (MeasurementsService::new(doer.clone()), doer)
    }

    #[tokio::test]
    async fn test_list_uses_fixed_window() {
        let (measurements, doer) = service(MockDoer::new().reply(StatusCode::OK, json!({"measurements": []})));

        measurements.list("g1", "host1", 27017, None).await.unwrap();

        assert_eq!(
            doer.paths(),
            vec!["groups/g1/processes/host1:27017/measurements?granularity=PT24H&period=PT24H"]
        );
    }

    #[tokio::test]
    async fn test_list_appends_options_after_window() {
        let (measurements, doer) = service(MockDoer::new().reply(StatusCode::OK, json!({"measurements": []})));

        let opts = ListOptions::page(2, 10);
        measurements.list("g1", "host1", 27017, Some(&opts)).await.unwrap();

        assert_eq!(
            doer.paths(),
            vec!["groups/g1/processes/host1:27017/measurements?granularity=PT24H&period=PT24H&pageNum=2&itemsPerPage=10"]
        );
    }

    #[tokio::test]
    async fn test_list_decodes_measurements_in_order() {
        let (measurements, _doer) = service(MockDoer::new().reply(
            StatusCode::OK,
            json!({
                "links": [{"rel": "self", "href": "https://cloud.mongodb.com/api/atlas/v1.0/groups/g1/processes/host1:27017/measurements"}],
                "measurements": [{
                    "name": "CONNECTIONS",
                    "units": "SCALAR",
                    "dataPoints": [
                        {"timestamp": "2019-06-20T00:00:00Z", "value": 12.0},
                        {"timestamp": "2019-06-21T00:00:00Z", "value": null},
                        {"timestamp": "2019-06-22T00:00:00Z", "value": 15.5}
                    ]
                }]
            }),
        ));

        let (list, response) = measurements.list("g1", "host1", 27017, None).await.unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "CONNECTIONS");
        let values: Vec<Option<f64>> = list[0].datapoints.iter().map(|d| d.value).collect();
        assert_eq!(values, vec![Some(12.0), None, Some(15.5)]);
        assert!(list[0].datapoints[0].timestamp_utc() < list[0].datapoints[2].timestamp_utc());
        assert_eq!(response.links.len(), 1);
    }

    #[tokio::test]
    async fn test_custom_window() {
        let (measurements, doer) = service(MockDoer::new().reply(StatusCode::OK, json!({"measurements": []})));

        let window = MeasurementWindow {
            granularity: "PT1M".to_string(),
            period: "PT1H".to_string(),
        };
        measurements
            .list_with_window("g1", "host1", 27017, &window, None)
            .await
            .unwrap();

        assert_eq!(
            doer.paths(),
            vec!["groups/g1/processes/host1:27017/measurements?granularity=PT1M&period=PT1H"]
        );
    }

    #[tokio::test]
    async fn test_invalid_arguments_issue_no_request() {
        let (measurements, doer) = service(MockDoer::new());

        for (group, host, port, expected) in [
            ("", "host1", 27017, "group_id"),
            ("g1", "", 27017, "host"),
            ("g1", "host1", 0, "port"),
            (".", "host1", 27017, "group_id"),
            ("..", "host1", 27017, "group_id"),
            ("g1", ".", 27017, "host"),
            ("g1", "..", 27017, "host"),
        ] {
            match measurements.list(group, host, port, None).await.unwrap_err() {
                AtlasError::InvalidArgument { name, .. } => assert_eq!(name, expected),
                other => panic!("expected invalid argument, got {other:?}"),
            }
        }

        assert!(doer.requests().is_empty());
    }

    proptest! {
        /// Whatever the host and port, the path keeps the fixed window first
        #[test]
        fn path_embeds_host_and_port(host in "[a-z][a-z0-9.-]{0,30}", port in 1u16..=u16::MAX) {
            let (measurements, doer) = service(MockDoer::new().reply(StatusCode::OK, json!({"measurements": []})));

            tokio_test::block_on(measurements.list("g1", &host, port, None)).unwrap();

            let expected = format!(
                "groups/g1/processes/{}:{}/measurements?granularity=PT24H&period=PT24H",
                host, port
            );
            prop_assert_eq!(doer.paths(), vec![expected]);
        }
    }
}
