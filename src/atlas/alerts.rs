//! Atlas Alerts
//!
//! List, fetch and acknowledge alerts raised for a project.
//! See <https://docs.atlas.mongodb.com/reference/api/alerts/>.

use super::options::{set_list_options, ListOptions};
use super::request::{require_segment, segment, send, RequestDoer};
use super::response::{ListEnvelope, Response};
use crate::error::{AtlasError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Alert operations
#[async_trait]
pub trait AlertsApi: Send + Sync {
    /// All alerts for the project `group_id`
    async fn list(&self, group_id: &str, options: Option<&ListOptions>) -> Result<(Vec<Alert>, Response)>;

    /// A single alert
    async fn get(&self, group_id: &str, alert_id: &str) -> Result<(Alert, Response)>;

    /// Acknowledge (or un-acknowledge) an alert, returning it as updated by the server
    async fn acknowledge(
        &self,
        group_id: &str,
        alert_id: &str,
        request: Option<&AcknowledgeRequest>,
    ) -> Result<(Alert, Response)>;
}

/// Lifecycle state of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Tracking,
    Open,
    Closed,
    Cancelled,
    /// Any status this client does not know about yet
    #[serde(other)]
    Unknown,
}

/// Current value of the metric that triggered the alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentValue {
    pub number: Option<f64>,
    pub units: Option<String>,
}

/// Target filter of an alert configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matcher {
    pub field_name: Option<String>,
    pub operator: Option<String>,
    pub value: Option<String>,
}

/// Threshold that causes a metric alert to fire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricThreshold {
    pub metric_name: Option<String>,
    pub operator: Option<String>,
    pub threshold: Option<f64>,
    pub units: Option<String>,
    pub mode: Option<String>,
}

/// Where and how notifications for an alert are delivered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub type_name: Option<String>,
    pub interval_min: Option<u32>,
    pub delay_min: Option<u32>,
    pub email_address: Option<String>,
    pub email_enabled: Option<bool>,
    pub sms_enabled: Option<bool>,
    pub mobile_number: Option<String>,
    pub username: Option<String>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub channel_name: Option<String>,
    pub flow_name: Option<String>,
    pub org_name: Option<String>,
    pub datadog_region: Option<String>,
    pub ops_genie_region: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A triggered alert condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Option<String>,
    pub group_id: Option<String>,
    pub alert_config_id: Option<String>,
    pub event_type_name: Option<String>,
    /// ISO-8601 timestamp the alert was opened
    pub created: Option<String>,
    pub updated: Option<String>,
    /// Absent is distinct from `false`
    pub enabled: Option<bool>,
    /// Only present once the alert is CLOSED
    pub resolved: Option<String>,
    pub status: Option<AlertStatus>,
    pub last_notified: Option<String>,
    pub acknowledged_until: Option<String>,
    pub acknowledgement_comment: Option<String>,
    pub acknowledging_username: Option<String>,
    pub hostname_and_port: Option<String>,
    pub metric_name: Option<String>,
    pub current_value: Option<CurrentValue>,
    pub replica_set_name: Option<String>,
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub matchers: Vec<Matcher>,
    pub metric_threshold: Option<MetricThreshold>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value?)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl Alert {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.created.as_deref())
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.updated.as_deref())
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.resolved.as_deref())
    }

    /// Whether the alert is acknowledged at `now`
    pub fn is_acknowledged_at(&self, now: DateTime<Utc>) -> bool {
        parse_timestamp(self.acknowledged_until.as_deref()).is_some_and(|until| until > now)
    }
}

/// Body of an acknowledge call; leaving both fields unset un-acknowledges
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgeRequest {
    /// ISO-8601 timestamp until which the alert stays acknowledged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged_until: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledgement_comment: Option<String>,
}

impl AcknowledgeRequest {
    pub fn until(until: DateTime<Utc>, comment: impl Into<String>) -> Self {
        Self {
            acknowledged_until: Some(until.to_rfc3339()),
            acknowledgement_comment: Some(comment.into()),
        }
    }
}

fn alerts_path(group_id: &str) -> String {
    format!("groups/{}/alerts", segment(group_id))
}

/// [`AlertsApi`] backed by a [`RequestDoer`]
#[derive(Clone)]
pub struct AlertsService {
    client: Arc<dyn RequestDoer>,
}

impl AlertsService {
    pub fn new(client: Arc<dyn RequestDoer>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AlertsApi for AlertsService {
    async fn list(&self, group_id: &str, options: Option<&ListOptions>) -> Result<(Vec<Alert>, Response)> {
        require_segment("group_id", group_id)?;

        let path = set_list_options(&alerts_path(group_id), options);
        let (envelope, response): (ListEnvelope<Alert>, _) =
            send(self.client.as_ref(), Method::GET, &path, None).await?;

        Ok(envelope.unwrap_into(response))
    }

    async fn get(&self, group_id: &str, alert_id: &str) -> Result<(Alert, Response)> {
        require_segment("group_id", group_id)?;
        require_segment("alert_id", alert_id)?;

        let path = format!("{}/{}", alerts_path(group_id), segment(alert_id));
        send(self.client.as_ref(), Method::GET, &path, None).await
    }

    async fn acknowledge(
        &self,
        group_id: &str,
        alert_id: &str,
        request: Option<&AcknowledgeRequest>,
    ) -> Result<(Alert, Response)> {
        require_segment("group_id", group_id)?;
        require_segment("alert_id", alert_id)?;
        let Some(request) = request else {
            return Err(AtlasError::must_be_set("request"));
        };

        let path = format!("{}/{}", alerts_path(group_id), segment(alert_id));
        let body = serde_json::to_value(request)?;
        send(self.client.as_ref(), Method::PATCH, &path, Some(body)).await
    }
}
