//! Typed async client for the MongoDB Atlas alerts, processes and
//! measurements APIs.
//!
//! ```no_run
//! use atlas_client::atlas::{AlertsApi, AtlasClient, DigestAuth};
//! use atlas_client::config::ClientConfig;
//!
//! # async fn run() -> atlas_client::Result<()> {
//! let client = AtlasClient::connect(&ClientConfig::default(), DigestAuth::new("public", "private"))?;
//! let (alerts, response) = client.alerts.list("5d0f1f73cf09a29120e123cd", None).await?;
//! println!("{} alerts, last page: {}", alerts.len(), response.is_last_page());
//! # Ok(())
//! # }
//! ```

pub mod atlas;
pub mod config;
pub mod error;

pub use error::{AtlasError, Result};
