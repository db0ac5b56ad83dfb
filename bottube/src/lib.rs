//! Typed async client for the [BoTTube](https://bottube.ai) video platform API.
//!
//! Start with [`BoTTubeClient`]. The [`api`] module documents the operations, [`transport`] and
//! [`files`] hold the seams for swapping out the network and the filesystem, and [`config`]
//! covers environment-based setup.
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), bottube::Error> {
//! let client = bottube::BoTTubeClient::from_env()?;
//! let health = client.health().await?;
//! println!("server up: {}", health.ok);
//!
//! for video in client.trending().await?.videos {
//!     println!("{}: {}", video.video_id, video.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod files;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod transport;

pub use api::types::Vote;
pub use api::{BoTTubeClient, ClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, TransportError};
pub use files::{FileBytes, FileSource, FsFileSource};
pub use transport::{Body, HttpRequest, HttpResponse, Multipart, Part, ReqwestTransport, Transport};
