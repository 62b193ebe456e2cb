//! Blocking HTTP client for the Overpass API.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use tagsync_model::Element;

use crate::error::OverpassResult;

/// Public Overpass endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

const USER_AGENT: &str = concat!("tagsync/", env!("CARGO_PKG_VERSION"));

/// The JSON envelope of an Overpass response. Everything except the
/// element array is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    #[serde(default)]
    pub(crate) elements: Vec<Element>,
}

/// A blocking Overpass API client.
///
/// The remote fetch is a one-shot call made once before reconciliation
/// begins, so the client is synchronous and carries a request timeout
/// matching the server-side query timeout.
pub struct OverpassClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl OverpassClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> OverpassResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Run a query and return the fetched elements.
    pub fn fetch(&self, query: &str) -> OverpassResult<Vec<Element>> {
        debug!(endpoint = %self.endpoint, "requesting remote dataset");
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("data", query)])
            .send()?
            .error_for_status()?;
        let body: OverpassResponse = response.json()?;
        debug!(elements = body.elements.len(), "remote dataset received");
        Ok(body.elements)
    }
}
