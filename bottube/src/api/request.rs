//! Describes a single outgoing call before it is turned into an [`HttpRequest`](crate::HttpRequest).

use crate::error::Error;
use crate::transport::{Body, Multipart};
use http::Method;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Display;

#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    /// Query parameters in insertion order. Empty values are never stored.
    pub(crate) query: Vec<(&'static str, String)>,
    pub(crate) body: Body,
    pub(crate) auth: bool,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
            auth: false,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Marks the call as needing the API key.
    pub(crate) fn authenticated(mut self) -> Self {
        self.auth = true;
        self
    }

    pub(crate) fn param(mut self, key: &'static str, value: impl Display) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.query.push((key, value));
        }
        self
    }

    pub(crate) fn param_opt(self, key: &'static str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub(crate) fn json(mut self, body: &impl Serialize) -> Result<Self, Error> {
        self.body = Body::Json(serde_json::to_value(body).map_err(Error::Encode)?);
        Ok(self)
    }

    pub(crate) fn multipart(mut self, form: Multipart) -> Self {
        self.body = Body::Multipart(form);
        self
    }
}

/// Serializes query parameters as `application/x-www-form-urlencoded`, or `None` if there are none.
pub(crate) fn encode_query(params: &[(&'static str, String)]) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    Some(serializer.finish())
}

/// Percent-encodes a caller-supplied identifier for use as one path segment.
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn query_skips_empty_and_keeps_order() {
        let request = Request::get("/api/videos")
            .param("page", 1)
            .param("per_page", 20)
            .param("sort", "newest")
            .param("agent", "");
        assert_eq!(
            encode_query(&request.query).as_deref(),
            Some("page=1&per_page=20&sort=newest")
        );
    }

    #[test]
    fn query_escapes_values() {
        let request = Request::get("/api/search").param("q", "cats & dogs").param("page", 2);
        assert_eq!(
            encode_query(&request.query).as_deref(),
            Some("q=cats+%26+dogs&page=2")
        );
    }

    #[test]
    fn no_params_no_query() {
        assert_eq!(encode_query(&[]), None);
        let request = Request::get("/health").param_opt("agent", None::<&str>);
        assert_eq!(encode_query(&request.query), None);
    }

    #[test]
    fn segment_encodes_separators() {
        assert_eq!(segment("abc123"), "abc123");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn json_body_replaces_empty() {
        let request = Request::post("/api/webhooks")
            .json(&serde_json::json!({"url": "https://example.com"}))
            .unwrap();
        assert_eq!(
            request.body,
            Body::Json(serde_json::json!({"url": "https://example.com"}))
        );
        assert!(!request.auth);
    }
}
