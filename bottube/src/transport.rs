//! The HTTP seam between the client and the network.
//!
//! [`BoTTubeClient`](crate::BoTTubeClient) never talks to the network directly. It hands a fully
//! built [`HttpRequest`] to a [`Transport`] and gets back the raw status and body. The default
//! transport is [`ReqwestTransport`]; tests substitute their own.
//!
//! Cancellation is expressed the usual way for futures: dropping the future returned by
//! [`Transport::send`] must abort the in-flight request.

use crate::error::{Error, TransportError};
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// The future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>>;

/// Dispatches one HTTP request and yields its response.
pub trait Transport: fmt::Debug + Send + Sync {
    fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// A request ready to go on the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    pub headers: HeaderMap,
    pub body: Body,
}

/// What came back from the server, before any decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// The request body. JSON and multipart payloads are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// A `multipart/form-data` payload. The transport picks the boundary and content type.
    Multipart(Multipart),
}

/// An ordered list of form parts for file uploads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Multipart {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        filename: String,
        bytes: Bytes,
    },
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, name: &'static str, filename: impl Into<String>, bytes: Bytes) -> Self {
        self.parts.push(Part::File {
            name,
            filename: filename.into(),
            bytes,
        });
        self
    }

    pub fn text(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.parts.push(Part::Text {
            name,
            value: value.into(),
        });
        self
    }

    /// Adds a text part only if `value` is present and non-empty.
    pub fn text_opt(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) if !value.is_empty() => self.text(name, value),
            _ => self,
        }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Looks up the value of the first text part called `name`.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            Part::Text { name: n, value } if *n == name => Some(value.as_str()),
            _ => None,
        })
    }

    fn into_form(self) -> reqwest::multipart::Form {
        self.parts
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, part| match part {
                Part::Text { name, value } => form.text(name, value),
                Part::File {
                    name,
                    filename,
                    bytes,
                } => form.part(
                    name,
                    reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(filename),
                ),
            })
    }
}

/// [`Transport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with its own connection pool.
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(concat!("bottube-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Configuration(format!("build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client, e.g. to share its connection pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let HttpRequest {
                method,
                url,
                headers,
                body,
            } = request;

            let request = self.client.request(method, url).headers(headers);
            let request = match body {
                Body::Empty => request,
                Body::Json(value) => request.json(&value),
                Body::Multipart(multipart) => request.multipart(multipart.into_form()),
            };

            let response = request.send().await.map_err(TransportError::new)?;
            let status = response.status();
            let body = response.bytes().await.map_err(TransportError::new)?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_opt_skips_absent_and_empty() {
        let form = Multipart::new()
            .text_opt("title", Some("T"))
            .text_opt("description", Some(""))
            .text_opt("scene_description", None);
        assert_eq!(form.parts().len(), 1);
        assert_eq!(form.text_value("title"), Some("T"));
        assert_eq!(form.text_value("description"), None);
    }

    #[test]
    fn parts_keep_insertion_order() {
        let form = Multipart::new()
            .file("video", "clip.mp4", Bytes::from_static(b"\0\x01"))
            .text("title", "T");
        assert!(matches!(
            form.parts(),
            [Part::File { name: "video", .. }, Part::Text { name: "title", .. }]
        ));
    }
}
