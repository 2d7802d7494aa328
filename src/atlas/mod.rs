//! Atlas API interaction module
//!
//! Typed services over the MongoDB Atlas v1.0 REST API. Every service call is
//! a single request/response round trip through a shared [`RequestDoer`].
//!
//! # Module Structure
//!
//! - [`auth`] - HTTP digest authentication with API keys
//! - [`client`] - [`AtlasClient`] bundling the services
//! - [`http`] - reqwest transport implementing [`RequestDoer`]
//! - [`request`] - the request-execution capability and call plumbing
//! - [`response`] - response metadata, links and the list envelope
//! - [`options`] - list options forwarded as query parameters
//! - [`alerts`], [`measurements`], [`processes`] - the resource services
//!
//! # Example
//!
//! ```no_run
//! use atlas_client::atlas::{AtlasClient, DigestAuth, MeasurementsApi, ProcessesApi};
//! use atlas_client::config::ClientConfig;
//!
//! async fn example() -> atlas_client::Result<()> {
//!     let client = AtlasClient::connect(&ClientConfig::load(), DigestAuth::new("public", "private"))?;
//!     let (processes, _) = client.processes.list("5d0f1f73cf09a29120e123cd", None).await?;
//!     for process in &processes {
//!         let (measurements, _) = client
//!             .measurements
//!             .list("5d0f1f73cf09a29120e123cd", &process.hostname, process.port, None)
//!             .await?;
//!         println!("{}: {} series", process, measurements.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod alerts;
pub mod auth;
pub mod client;
pub mod http;
pub mod measurements;
pub mod options;
pub mod processes;
pub mod request;
pub mod response;

pub use alerts::{AcknowledgeRequest, Alert, AlertStatus, AlertsApi, AlertsService};
pub use auth::DigestAuth;
pub use client::AtlasClient;
pub use http::AtlasHttpClient;
pub use measurements::{Datapoint, Measurement, MeasurementWindow, MeasurementsApi, MeasurementsService};
pub use options::{set_list_options, ListOptions};
pub use processes::{Process, ProcessesApi, ProcessesService};
pub use request::{ApiRequest, RawResponse, RequestDoer};
pub use response::{Link, Response};
