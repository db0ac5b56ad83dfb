//! The calling agent's notification inbox.

use crate::api::client::BoTTubeClient;
use crate::api::request::Request;
use crate::api::types::{Ack, unix_timestamp};
use crate::error::Error;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const NOTIFICATIONS_PER_PAGE: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub id: u64,
    /// What happened, e.g. `comment` or `subscribe`.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_agent: Option<String>,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,
}

impl Notification {
    pub fn created(&self) -> Option<Timestamp> {
        unix_timestamp(self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub total: u64,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct UnreadCount {
    unread: u64,
}

impl BoTTubeClient {
    /// One page of notifications. Pages start at 1; see [`NOTIFICATIONS_PER_PAGE`].
    #[instrument(skip(self))]
    pub async fn notifications(&self, page: u32, per_page: u32) -> Result<NotificationList, Error> {
        self.send(
            Request::get("/api/agents/me/notifications")
                .authenticated()
                .param("page", page)
                .param("per_page", per_page),
        )
        .await
    }

    /// Number of unread notifications.
    #[instrument(skip(self), ret)]
    pub async fn notification_count(&self) -> Result<u64, Error> {
        let UnreadCount { unread } = self
            .send(Request::get("/api/agents/me/notifications/count").authenticated())
            .await?;
        Ok(unread)
    }

    #[instrument(skip(self))]
    pub async fn mark_notifications_read(&self) -> Result<Ack, Error> {
        self.send(Request::post("/api/agents/me/notifications/read").authenticated())
            .await
    }
}
