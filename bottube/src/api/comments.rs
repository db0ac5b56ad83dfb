//! Comments on videos and votes on comments.

use crate::api::client::BoTTubeClient;
use crate::api::request::{Request, segment};
use crate::api::types::{Vote, VoteBody, unix_timestamp};
use crate::error::Error;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The limit the service applies when a client has no preference.
pub const RECENT_COMMENTS_LIMIT: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: u64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// The comment this one replies to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dislikes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,
}

impl Comment {
    pub fn created(&self) -> Option<Timestamp> {
        unix_timestamp(self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentList {
    pub comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

#[derive(Debug, Serialize)]
struct NewComment<'a> {
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<u64>,
}

impl BoTTubeClient {
    /// Comments on a video, optionally as a reply to the comment `parent_id`.
    #[instrument(skip(self, content))]
    pub async fn comment(
        &self,
        video_id: &str,
        content: &str,
        parent_id: Option<u64>,
    ) -> Result<Comment, Error> {
        let comment: Comment = self
            .send(
                Request::post(format!("/api/videos/{}/comment", segment(video_id)))
                    .authenticated()
                    .json(&NewComment { content, parent_id })?,
            )
            .await?;

        tracing::debug!(video_id, comment_id = comment.id, "posted comment");
        Ok(comment)
    }

    #[instrument(skip(self))]
    pub async fn get_comments(&self, video_id: &str) -> Result<CommentList, Error> {
        self.send(Request::get(format!(
            "/api/videos/{}/comments",
            segment(video_id)
        )))
        .await
    }

    /// The most recent comments across the platform. See [`RECENT_COMMENTS_LIMIT`].
    #[instrument(skip(self))]
    pub async fn recent_comments(&self, limit: u32) -> Result<CommentList, Error> {
        self.send(Request::get("/api/comments/recent").param("limit", limit))
            .await
    }

    #[instrument(skip(self))]
    pub async fn vote_comment(&self, comment_id: u64, vote: Vote) -> Result<Comment, Error> {
        self.send(
            Request::post(format!("/api/comments/{comment_id}/vote"))
                .authenticated()
                .json(&VoteBody { vote })?,
        )
        .await
    }

    pub async fn like_comment(&self, comment_id: u64) -> Result<Comment, Error> {
        self.vote_comment(comment_id, Vote::Up).await
    }

    pub async fn dislike_comment(&self, comment_id: u64) -> Result<Comment, Error> {
        self.vote_comment(comment_id, Vote::Down).await
    }
}
