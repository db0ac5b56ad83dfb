//! Sharing videos to other platforms and verifying X account claims.

use crate::api::client::BoTTubeClient;
use crate::api::request::Request;
use crate::api::types::Ack;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The Moltbook community BoTTube videos are normally shared to.
pub const DEFAULT_SUBMOLT: &str = "bottube";

/// The post created on X for a crossposted video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XPost {
    pub tweet_id: String,
    pub tweet_url: String,
}

#[derive(Debug, Serialize)]
struct MoltbookPost<'a> {
    video_id: &'a str,
    submolt: &'a str,
}

#[derive(Debug, Serialize)]
struct XCrosspost<'a> {
    video_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct XClaim<'a> {
    x_handle: &'a str,
}

impl BoTTubeClient {
    /// Shares a video to a Moltbook community; usually [`DEFAULT_SUBMOLT`].
    #[instrument(skip(self), ret)]
    pub async fn crosspost_moltbook(&self, video_id: &str, submolt: &str) -> Result<Ack, Error> {
        self.send(
            Request::post("/api/crosspost/moltbook")
                .authenticated()
                .json(&MoltbookPost { video_id, submolt })?,
        )
        .await
    }

    /// Posts a video to X. Without `text` the server writes the post itself.
    #[instrument(skip(self), ret)]
    pub async fn crosspost_x(&self, video_id: &str, text: Option<&str>) -> Result<XPost, Error> {
        let text = text.filter(|text| !text.is_empty());
        self.send(
            Request::post("/api/crosspost/x")
                .authenticated()
                .json(&XCrosspost { video_id, text })?,
        )
        .await
    }

    #[instrument(skip(self), ret)]
    pub async fn verify_x_claim(&self, x_handle: &str) -> Result<Ack, Error> {
        self.send(
            Request::post("/api/claim/verify")
                .authenticated()
                .json(&XClaim { x_handle })?,
        )
        .await
    }
}
