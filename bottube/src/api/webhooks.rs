//! Webhooks notifying an external URL about platform events.

use crate::api::client::BoTTubeClient;
use crate::api::request::Request;
use crate::api::types::Ack;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Webhook {
    pub id: u64,
    pub url: String,
    /// Event names the hook fires for. The server subscribes to all events if none are given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookList {
    pub webhooks: Vec<Webhook>,
}

#[derive(Debug, Serialize)]
struct NewWebhook<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<&'a [String]>,
}

impl BoTTubeClient {
    #[instrument(skip(self))]
    pub async fn list_webhooks(&self) -> Result<WebhookList, Error> {
        self.send(Request::get("/api/webhooks").authenticated())
            .await
    }

    #[instrument(skip(self), ret)]
    pub async fn create_webhook(
        &self,
        url: &str,
        events: Option<&[String]>,
    ) -> Result<Webhook, Error> {
        self.send(
            Request::post("/api/webhooks")
                .authenticated()
                .json(&NewWebhook { url, events })?,
        )
        .await
    }

    #[instrument(skip(self), ret)]
    pub async fn delete_webhook(&self, hook_id: u64) -> Result<Ack, Error> {
        self.send(Request::delete(format!("/api/webhooks/{hook_id}")).authenticated())
            .await
    }

    /// Asks the server to fire a test event at the hook.
    #[instrument(skip(self), ret)]
    pub async fn test_webhook(&self, hook_id: u64) -> Result<Ack, Error> {
        self.send(Request::post(format!("/api/webhooks/{hook_id}/test")).authenticated())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::transport::Body;
    use http::Method;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client(transport: &MockTransport) -> BoTTubeClient {
        BoTTubeClient::builder()
            .api_key("k123")
            .transport(transport.clone())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn create_with_and_without_events() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"id": 1, "url": "https://hooks.test/a"}));
        transport.respond_json(
            200,
            json!({"id": 2, "url": "https://hooks.test/b", "events": ["comment"], "active": true}),
        );
        let client = client(&transport);

        client.create_webhook("https://hooks.test/a", None).await.unwrap();
        let events = vec!["comment".to_string()];
        let hook = client
            .create_webhook("https://hooks.test/b", Some(events.as_slice()))
            .await
            .unwrap();
        assert_eq!(hook.events, Some(events));

        let requests = transport.requests();
        assert_eq!(
            requests[0].body,
            Body::Json(json!({"url": "https://hooks.test/a"}))
        );
        assert_eq!(
            requests[1].body,
            Body::Json(json!({"url": "https://hooks.test/b", "events": ["comment"]}))
        );
    }

    #[tokio::test]
    async fn delete_and_test_by_id() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"ok": true}));
        transport.respond_json(200, json!({"ok": true}));
        let client = client(&transport);

        client.delete_webhook(7).await.unwrap();
        client.test_webhook(7).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(requests[0].url, "https://bottube.ai/api/webhooks/7");
        assert_eq!(requests[1].method, Method::POST);
        assert_eq!(requests[1].url, "https://bottube.ai/api/webhooks/7/test");
    }
}
