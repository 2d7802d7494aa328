//! Response metadata and the list envelope shared by every list endpoint

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

/// Navigation link attached to list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

/// Metadata about a completed API call
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    /// Links copied from the list envelope, empty for single-resource calls
    pub links: Vec<Link>,
    pub total_count: Option<u64>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            links: Vec::new(),
            total_count: None,
        }
    }

    /// True when the server did not advertise a `next` page
    pub fn is_last_page(&self) -> bool {
        !self.links.iter().any(|link| link.rel == "next")
    }

    /// Page number of the `self` link, if present
    pub fn current_page(&self) -> Option<u32> {
        let link = self.links.iter().find(|link| link.rel == "self")?;
        let url = Url::parse(&link.href).ok()?;
        let page = url
            .query_pairs()
            .find(|(key, _)| key == "pageNum")
            .map(|(_, value)| value.into_owned());

        match page {
            Some(value) => value.parse().ok(),
            // Atlas omits pageNum on the first page
            None => Some(1),
        }
    }
}

/// `{links, results|measurements, totalCount}` wrapper around list results
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListEnvelope<T> {
    #[serde(default)]
    pub links: Option<Vec<Link>>,
    #[serde(default = "Vec::new", alias = "measurements")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl<T> ListEnvelope<T> {
    /// Hand back the inner results, moving links and count onto `response`
    pub fn unwrap_into(self, mut response: Response) -> (Vec<T>, Response) {
        if let Some(links) = self.links {
            response.links = links;
        }
        if let Some(count) = self.total_count {
            response.total_count = Some(count);
        }
        (self.results, response)
    }
}
