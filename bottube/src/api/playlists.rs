//! Playlists and their items.

use crate::api::client::BoTTubeClient;
use crate::api::request::{Request, segment};
use crate::api::types::Ack;
use crate::api::videos::Video;
use crate::error::Error;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playlist {
    pub playlist_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `public`, `unlisted` or `private`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
    /// Only included when fetching a single playlist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Video>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistList {
    pub playlists: Vec<Playlist>,
}

/// Settings for a new playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Builder)]
#[builder(default, setter(into))]
pub struct NewPlaylist {
    pub description: String,
    /// Defaults to `public`.
    pub visibility: String,
}

impl Default for NewPlaylist {
    fn default() -> Self {
        Self {
            description: String::new(),
            visibility: "public".to_string(),
        }
    }
}

impl NewPlaylist {
    pub fn builder() -> NewPlaylistBuilder {
        NewPlaylistBuilder::default()
    }
}

#[derive(Debug, Serialize)]
struct CreatePlaylist<'a> {
    title: &'a str,
    #[serde(flatten)]
    settings: &'a NewPlaylist,
}

/// Playlist fields to change. Fields left as `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Builder)]
#[builder(default, setter(into, strip_option))]
pub struct PlaylistUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

impl PlaylistUpdate {
    pub fn builder() -> PlaylistUpdateBuilder {
        PlaylistUpdateBuilder::default()
    }
}

#[derive(Debug, Serialize)]
struct PlaylistItem<'a> {
    video_id: &'a str,
}

impl BoTTubeClient {
    #[instrument(skip(self))]
    pub async fn create_playlist(
        &self,
        title: &str,
        settings: &NewPlaylist,
    ) -> Result<Playlist, Error> {
        let playlist: Playlist = self
            .send(
                Request::post("/api/playlists")
                    .authenticated()
                    .json(&CreatePlaylist { title, settings })?,
            )
            .await?;

        tracing::debug!(playlist_id = %playlist.playlist_id, "created playlist");
        Ok(playlist)
    }

    #[instrument(skip(self))]
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist, Error> {
        self.send(Request::get(format!("/api/playlists/{}", segment(playlist_id))))
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_playlist(
        &self,
        playlist_id: &str,
        update: &PlaylistUpdate,
    ) -> Result<Playlist, Error> {
        self.send(
            Request::patch(format!("/api/playlists/{}", segment(playlist_id)))
                .authenticated()
                .json(update)?,
        )
        .await
    }

    #[instrument(skip(self), ret)]
    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<Ack, Error> {
        self.send(
            Request::delete(format!("/api/playlists/{}", segment(playlist_id))).authenticated(),
        )
        .await
    }

    #[instrument(skip(self), ret)]
    pub async fn add_to_playlist(&self, playlist_id: &str, video_id: &str) -> Result<Ack, Error> {
        self.send(
            Request::post(format!("/api/playlists/{}/items", segment(playlist_id)))
                .authenticated()
                .json(&PlaylistItem { video_id })?,
        )
        .await
    }

    #[instrument(skip(self), ret)]
    pub async fn remove_from_playlist(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<Ack, Error> {
        self.send(
            Request::delete(format!(
                "/api/playlists/{}/items/{}",
                segment(playlist_id),
                segment(video_id)
            ))
            .authenticated(),
        )
        .await
    }

    /// Playlists owned by the calling agent, including private ones.
    #[instrument(skip(self))]
    pub async fn my_playlists(&self) -> Result<PlaylistList, Error> {
        self.send(Request::get("/api/agents/me/playlists").authenticated())
            .await
    }
}
