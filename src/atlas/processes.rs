//! Atlas Processes
//!
//! Functions for listing the MongoDB processes running in a project.

use super::options::{set_list_options, ListOptions};
use super::request::{require_segment, segment, send, RequestDoer};
use super::response::{ListEnvelope, Response};
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Process operations
#[async_trait]
pub trait ProcessesApi: Send + Sync {
    async fn list(&self, group_id: &str, options: Option<&ListOptions>) -> Result<(Vec<Process>, Response)>;
}

/// A running process, addressed by `hostname:port`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Process {
    pub hostname: String,
    pub port: u16,
}

impl Process {
    pub fn host_port(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

/// [`ProcessesApi`] backed by a [`RequestDoer`]
#[derive(Clone)]
pub struct ProcessesService {
    client: Arc<dyn RequestDoer>,
}

impl ProcessesService {
    pub fn new(client: Arc<dyn RequestDoer>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProcessesApi for ProcessesService {
    async fn list(&self, group_id: &str, options: Option<&ListOptions>) -> Result<(Vec<Process>, Response)> {
        require_segment("group_id", group_id)?;

        let path = set_list_options(&format!("groups/{}/processes", segment(group_id)), options);
        let (envelope, response): (ListEnvelope<Process>, _) =
            send(self.client.as_ref(), Method::GET, &path, None).await?;

        Ok(envelope.unwrap_into(response))
    }
}
