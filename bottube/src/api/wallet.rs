//! Payout addresses, RTC balance and earnings history.

use crate::api::client::BoTTubeClient;
use crate::api::request::Request;
use crate::api::types::{UpdatedFields, unix_timestamp};
use crate::error::Error;
use derive_builder::Builder;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

pub const EARNINGS_PER_PAGE: u32 = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wallet {
    pub rtc_balance: f64,
    /// Payout address per currency, e.g. `btc` → address.
    pub wallets: BTreeMap<String, String>,
}

/// Payout addresses to set. Currencies left as `None` are not sent and keep their address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Builder)]
#[builder(default, setter(into, strip_option))]
pub struct WalletUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub btc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ltc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal: Option<String>,
}

impl WalletUpdate {
    pub fn builder() -> WalletUpdateBuilder {
        WalletUpdateBuilder::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Earning {
    pub amount: f64,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<f64>,
}

impl Earning {
    pub fn created(&self) -> Option<Timestamp> {
        unix_timestamp(self.created_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarningList {
    pub rtc_balance: f64,
    pub earnings: Vec<Earning>,
    pub total: u64,
}

impl BoTTubeClient {
    #[instrument(skip(self))]
    pub async fn get_wallet(&self) -> Result<Wallet, Error> {
        self.send(Request::get("/api/agents/me/wallet").authenticated())
            .await
    }

    #[instrument(skip(self), ret)]
    pub async fn update_wallet(&self, update: &WalletUpdate) -> Result<UpdatedFields, Error> {
        self.send(
            Request::post("/api/agents/me/wallet")
                .authenticated()
                .json(update)?,
        )
        .await
    }

    /// Earnings history. Pages start at 1; see [`EARNINGS_PER_PAGE`].
    #[instrument(skip(self))]
    pub async fn get_earnings(&self, page: u32, per_page: u32) -> Result<EarningList, Error> {
        self.send(
            Request::get("/api/agents/me/earnings")
                .authenticated()
                .param("page", page)
                .param("per_page", per_page),
        )
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

    fn client(transport: &MockTransport) -> BoTTubeClient {
        BoTTubeClient::builder()
            .api_key("k123")
            .transport(transport.clone())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn wallet_update_is_sparse() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"updated_fields": ["btc", "paypal"]}));
        let client = client(&transport);

        let update = WalletUpdate::builder()
            .btc("bc1qexample")
            .paypal("agent@example.com")
            .build()
            .unwrap();
        let updated = client.update_wallet(&update).await.unwrap();
        assert_eq!(updated.updated_fields, vec!["btc", "paypal"]);
        assert_eq!(
            transport.last_request().unwrap().body,
            Body::Json(json!({"btc": "bc1qexample", "paypal": "agent@example.com"}))
        );
    }

    #[tokio::test]
    async fn wallet_and_earnings_decode() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"rtc_balance": 1.5, "wallets": {"btc": "bc1q"}}));
        transport.respond_json(
            200,
            json!({
                "rtc_balance": 1.5,
                "earnings": [{"amount": 0.5, "reason": "tip", "video_id": "v1", "created_at": 1_700_000_000}],
                "total": 1
            }),
        );
        let client = client(&transport);

        let wallet = client.get_wallet().await.unwrap();
        assert_eq!(wallet.wallets["btc"], "bc1q");

        let earnings = client.get_earnings(1, EARNINGS_PER_PAGE).await.unwrap();
        assert_eq!(earnings.earnings[0].reason, "tip");
        assert!(earnings.earnings[0].created().is_some());
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://bottube.ai/api/agents/me/earnings?page=1&per_page=50"
        );
    }
}
