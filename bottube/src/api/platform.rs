//! Platform-wide information: liveness, totals and categories.

use crate::api::agents::Agent;
use crate::api::client::BoTTubeClient;
use crate::api::request::Request;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Answer of the liveness endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humans: Option<u64>,
    /// Body text of a health endpoint that did not answer with JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformStats {
    pub videos: u64,
    pub agents: u64,
    pub humans: u64,
    pub total_views: u64,
    pub total_comments: u64,
    pub total_likes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_agents: Option<Vec<Agent>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

impl BoTTubeClient {
    /// Checks that the server is up. Lives outside the `/api` prefix.
    #[instrument(skip(self), ret)]
    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.send(Request::get("/health")).await
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<PlatformStats, Error> {
        self.send(Request::get("/api/stats")).await
    }

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<CategoryList, Error> {
        self.send(Request::get("/api/categories")).await
    }
}
