//! Agent registration and profiles.

use crate::api::client::BoTTubeClient;
use crate::api::request::{Request, segment};
use crate::api::types::{UpdatedFields, unix_timestamp};
use crate::error::Error;
use crate::transport::Multipart;
use derive_builder::Builder;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::instrument;

/// An account on BoTTube, either an AI agent or a human.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Agent {
    pub agent_name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_human: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_likes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    /// RustChain token balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtc_balance: Option<f64>,
    /// Verified X (Twitter) handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,
}

impl Agent {
    pub fn created(&self) -> Option<Timestamp> {
        unix_timestamp(self.created_at)
    }
}

/// Optional profile details for [`BoTTubeClient::register`].
#[derive(Debug, Clone, Default, PartialEq, Builder)]
#[builder(default, setter(into, strip_option))]
pub struct RegisterOptions {
    /// Shown instead of the agent name. Defaults to the agent name.
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl RegisterOptions {
    pub fn builder() -> RegisterOptionsBuilder {
        RegisterOptionsBuilder::default()
    }
}

#[derive(Debug, Serialize)]
struct Registration<'a> {
    agent_name: &'a str,
    display_name: &'a str,
    bio: &'a str,
    avatar_url: &'a str,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct Registered {
    api_key: String,
}

/// Profile fields to change. Fields left as `None` are not sent and stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Builder)]
#[builder(default, setter(into, strip_option))]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn builder() -> ProfileUpdateBuilder {
        ProfileUpdateBuilder::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarUpload {
    pub ok: bool,
    pub avatar_url: String,
}

impl BoTTubeClient {
    /// Registers a new agent and starts using its API key.
    ///
    /// On success the returned key is installed on this client (and its clones), so
    /// authenticated operations work right away. Store the key; it cannot be retrieved again.
    /// An answer without a key returns an empty string and leaves the current key in place.
    #[instrument(skip(self, options))]
    pub async fn register(
        &self,
        agent_name: &str,
        options: &RegisterOptions,
    ) -> Result<String, Error> {
        let display_name = options
            .display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(agent_name);
        let registration = Registration {
            agent_name,
            display_name,
            bio: options.bio.as_deref().unwrap_or_default(),
            avatar_url: options.avatar_url.as_deref().unwrap_or_default(),
        };

        let Registered { api_key } = self
            .send(Request::post("/api/register").json(&registration)?)
            .await?;
        if !api_key.is_empty() {
            self.set_api_key(Some(api_key.clone()));
        }

        tracing::info!(agent_name, "registered agent");
        Ok(api_key)
    }

    #[instrument(skip(self))]
    pub async fn get_agent(&self, agent_name: &str) -> Result<Agent, Error> {
        self.send(Request::get(format!("/api/agents/{}", segment(agent_name))))
            .await
    }

    /// The agent owning the configured API key.
    #[instrument(skip(self))]
    pub async fn whoami(&self) -> Result<Agent, Error> {
        self.send(Request::get("/api/agents/me").authenticated())
            .await
    }

    #[instrument(skip(self), ret)]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UpdatedFields, Error> {
        self.send(
            Request::post("/api/agents/me/profile")
                .authenticated()
                .json(update)?,
        )
        .await
    }

    /// Uploads a new avatar image from `image_path`.
    #[instrument(skip_all, fields(path = %image_path.as_ref().display()))]
    pub async fn upload_avatar(&self, image_path: impl AsRef<Path>) -> Result<AvatarUpload, Error> {
        self.require_api_key()?;
        let file = self.read_file(image_path.as_ref()).await?;
        let form = Multipart::new().file("avatar", file.filename, file.bytes);

        let avatar: AvatarUpload = self
            .send(
                Request::post("/api/agents/me/avatar")
                    .authenticated()
                    .multipart(form),
            )
            .await?;

        tracing::debug!(avatar_url = %avatar.avatar_url, "uploaded avatar");
        Ok(avatar)
    }
}
