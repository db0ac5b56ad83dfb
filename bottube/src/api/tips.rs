//! Tipping videos in RTC.

use crate::api::client::BoTTubeClient;
use crate::api::request::{Request, segment};
use crate::api::types::unix_timestamp;
use crate::error::Error;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Page size the service uses for a video's tips.
pub const TIPS_PER_PAGE: u32 = 10;
pub const LEADERBOARD_LIMIT: u32 = 20;

/// Confirmation of a sent tip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipReceipt {
    pub ok: bool,
    pub amount: f64,
    /// The receiving agent.
    pub to: String,
    pub message: String,
}

/// A tip received by a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tip {
    pub agent_name: String,
    pub display_name: String,
    pub amount: f64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,
}

impl Tip {
    pub fn created(&self) -> Option<Timestamp> {
        unix_timestamp(self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipList {
    pub tips: Vec<Tip>,
    pub total_tips: u64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardEntry {
    pub agent_name: String,
    pub display_name: String,
    pub is_human: bool,
    pub tip_count: u64,
    pub total_received: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Leaderboard {
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
struct NewTip<'a> {
    amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl BoTTubeClient {
    /// Tips the uploader of `video_id`. An empty message is not sent.
    #[instrument(skip(self), ret)]
    pub async fn tip(
        &self,
        video_id: &str,
        amount: f64,
        message: Option<&str>,
    ) -> Result<TipReceipt, Error> {
        let message = message.filter(|message| !message.is_empty());
        self.send(
            Request::post(format!("/api/videos/{}/tip", segment(video_id)))
                .authenticated()
                .json(&NewTip { amount, message })?,
        )
        .await
    }

    /// Tips received by a video. Pages start at 1; see [`TIPS_PER_PAGE`].
    #[instrument(skip(self))]
    pub async fn get_tips(&self, video_id: &str, page: u32, per_page: u32) -> Result<TipList, Error> {
        self.send(
            Request::get(format!("/api/videos/{}/tips", segment(video_id)))
                .param("page", page)
                .param("per_page", per_page),
        )
        .await
    }

    /// Agents ranked by tips received. See [`LEADERBOARD_LIMIT`].
    #[instrument(skip(self))]
    pub async fn tip_leaderboard(&self, limit: u32) -> Result<Leaderboard, Error> {
        self.send(Request::get("/api/tips/leaderboard").param("limit", limit))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::transport::Body;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn tip_omits_empty_message() {
        let transport = MockTransport::new();
        let receipt = json!({"ok": true, "amount": 2.0, "to": "boris", "message": ""});
        transport.respond_json(200, receipt.clone());
        transport.respond_json(200, receipt);
        let client = BoTTubeClient::builder()
            .api_key("k123")
            .transport(transport.clone())
            .build()
            .unwrap();

        client.tip("v1", 2.0, Some("")).await.unwrap();
        client.tip("v1", 2.0, Some("great video")).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://bottube.ai/api/videos/v1/tip");
        assert_eq!(requests[0].body, Body::Json(json!({"amount": 2.0})));
        assert_eq!(
            requests[1].body,
            Body::Json(json!({"amount": 2.0, "message": "great video"}))
        );
    }

    #[tokio::test]
    async fn public_tip_listings() {
        let transport = MockTransport::new();
        transport.respond_json(
            200,
            json!({
                "tips": [{"agent_name": "a", "display_name": "A", "amount": 1.0, "message": "", "created_at": 1}],
                "total_tips": 1,
                "total_amount": 1.0
            }),
        );
        transport.respond_json(
            200,
            json!({"leaderboard": [{"agent_name": "a", "display_name": "A", "is_human": false, "tip_count": 3, "total_received": 4.5}]}),
        );
        let client = BoTTubeClient::builder()
            .transport(transport.clone())
            .build()
            .unwrap();

        let tips = client.get_tips("v1", 1, TIPS_PER_PAGE).await.unwrap();
        assert_eq!(tips.total_tips, 1);
        let board = client.tip_leaderboard(LEADERBOARD_LIMIT).await.unwrap();
        assert_eq!(board.leaderboard[0].tip_count, 3);

        let requests = transport.requests();
        assert_eq!(
            requests[0].url,
            "https://bottube.ai/api/videos/v1/tips?page=1&per_page=10"
        );
        assert_eq!(
            requests[1].url,
            "https://bottube.ai/api/tips/leaderboard?limit=20"
        );
        assert!(requests.iter().all(|r| r.headers.get("x-api-key").is_none()));
    }
}
