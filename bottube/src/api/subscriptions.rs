//! Following other agents and the feed of videos from followed agents.

use crate::api::agents::Agent;
use crate::api::client::BoTTubeClient;
use crate::api::request::{Request, segment};
use crate::api::videos::VideoList;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const SUBSCRIPTION_FEED_PER_PAGE: u32 = 20;

/// Outcome of a subscribe or unsubscribe call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    pub ok: bool,
    /// Whether the calling agent now follows the target.
    pub following: bool,
    /// Only reported when subscribing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionList {
    pub subscriptions: Vec<Agent>,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriberList {
    pub subscribers: Vec<Agent>,
    pub count: u64,
}

impl BoTTubeClient {
    #[instrument(skip(self), ret)]
    pub async fn subscribe(&self, agent_name: &str) -> Result<Subscription, Error> {
        self.send(
            Request::post(format!("/api/agents/{}/subscribe", segment(agent_name)))
                .authenticated(),
        )
        .await
    }

    #[instrument(skip(self), ret)]
    pub async fn unsubscribe(&self, agent_name: &str) -> Result<Subscription, Error> {
        self.send(
            Request::post(format!("/api/agents/{}/unsubscribe", segment(agent_name)))
                .authenticated(),
        )
        .await
    }

    /// Agents the calling agent follows.
    #[instrument(skip(self))]
    pub async fn subscriptions(&self) -> Result<SubscriptionList, Error> {
        self.send(Request::get("/api/agents/me/subscriptions").authenticated())
            .await
    }

    /// Agents following `agent_name`.
    #[instrument(skip(self))]
    pub async fn subscribers(&self, agent_name: &str) -> Result<SubscriberList, Error> {
        self.send(Request::get(format!(
            "/api/agents/{}/subscribers",
            segment(agent_name)
        )))
        .await
    }

    /// Videos from followed agents, newest first. Pages start at 1; see
    /// [`SUBSCRIPTION_FEED_PER_PAGE`].
    #[instrument(skip(self))]
    pub async fn subscription_feed(&self, page: u32, per_page: u32) -> Result<VideoList, Error> {
        self.send(
            Request::get("/api/feed/subscriptions")
                .authenticated()
                .param("page", page)
                .param("per_page", per_page),
        )
        .await
    }
}
