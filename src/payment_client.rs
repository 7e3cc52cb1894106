use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::configuration::BogConfig;

/// Order data sent to a payment gateway. Amounts are in tetri.
#[derive(Debug)]
pub struct GatewayOrderRequest<'a> {
    pub external_order_id: &'a str,
    pub total_amount: i64,
    pub basket: Vec<GatewayBasketItem<'a>>,
}

#[derive(Debug)]
pub struct GatewayBasketItem<'a> {
    pub product_id: String,
    pub description: &'a str,
    pub quantity: i32,
    pub unit_price: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayOrder {
    pub gateway_order_id: String,
    pub redirect_url: String,
}

/// Payment state of a gateway order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayPaymentStatus {
    Completed,
    Rejected,
    InProgress,
}

impl GatewayPaymentStatus {
    pub fn from_key(key: &str) -> Self {
        match key {
            "completed" => GatewayPaymentStatus::Completed,
            "rejected" => GatewayPaymentStatus::Rejected,
            _ => GatewayPaymentStatus::InProgress,
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + std::fmt::Debug {
    async fn create_order(
        &self,
        request: &GatewayOrderRequest<'_>,
    ) -> Result<GatewayOrder, anyhow::Error>;

    /// Current status of `gateway_order_id` as recorded by the gateway.
    async fn fetch_order_status(
        &self,
        gateway_order_id: &str,
    ) -> Result<GatewayPaymentStatus, anyhow::Error>;
}

/// Converts tetri into lari with two decimals as expected by the gateway.
pub fn to_gel(minor: i64) -> f64 {
    minor as f64 / 100.0
}

#[derive(Debug, Deserialize)]
struct BogAccessToken {
    access_token: SecretString,
}

#[derive(Debug, Serialize)]
struct BogBasketItem<'a> {
    quantity: i32,
    unit_price: f64,
    product_id: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct BogPurchaseUnits<'a> {
    currency: &'static str,
    total_amount: f64,
    basket: Vec<BogBasketItem<'a>>,
}

#[derive(Debug, Serialize)]
struct BogRedirectUrls<'a> {
    fail: &'a str,
    success: &'a str,
}

#[derive(Debug, Serialize)]
struct BogOrderCreateRequest<'a> {
    callback_url: &'a str,
    external_order_id: &'a str,
    purchase_units: BogPurchaseUnits<'a>,
    redirect_urls: BogRedirectUrls<'a>,
}

#[derive(Debug, Deserialize)]
struct BogLink {
    href: String,
}

#[derive(Debug, Deserialize)]
struct BogOrderLinks {
    redirect: BogLink,
}

#[derive(Debug, Deserialize)]
struct BogOrderCreateResponse {
    id: String,
    #[serde(rename = "_links")]
    links: BogOrderLinks,
}

#[derive(Debug, Deserialize)]
struct BogReceiptStatus {
    key: String,
}

#[derive(Debug, Deserialize)]
struct BogReceipt {
    order_status: BogReceiptStatus,
}

/// Bank of Georgia online payments client.
#[derive(Debug)]
pub struct BogClient {
    http_client: Client,
    base_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: SecretString,
    callback_url: String,
    success_url: String,
    fail_url: String,
}

impl BogClient {
    #[tracing::instrument(skip(config))]
    pub fn new(config: &BogConfig) -> Result<Self, anyhow::Error> {
        tracing::info!("Establishing connection to the BOG payment server.");
        let http_client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            oauth_url: config.oauth_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            callback_url: config.callback_url.clone(),
            success_url: config.success_url.clone(),
            fail_url: config.fail_url.clone(),
        })
    }

    fn build_order_request<'a>(
        &'a self,
        request: &'a GatewayOrderRequest<'a>,
    ) -> BogOrderCreateRequest<'a> {
        BogOrderCreateRequest {
            callback_url: &self.callback_url,
            external_order_id: request.external_order_id,
            purchase_units: BogPurchaseUnits {
                currency: "GEL",
                total_amount: to_gel(request.total_amount),
                basket: request
                    .basket
                    .iter()
                    .map(|item| BogBasketItem {
                        quantity: item.quantity,
                        unit_price: to_gel(item.unit_price),
                        product_id: &item.product_id,
                        description: item.description,
                    })
                    .collect(),
            },
            redirect_urls: BogRedirectUrls {
                fail: &self.fail_url,
                success: &self.success_url,
            },
        }
    }

    #[tracing::instrument(name = "Fetch BOG access token", skip(self))]
    async fn get_access_token(&self) -> Result<SecretString, anyhow::Error> {
        let response = self
            .http_client
            .post(&self.oauth_url)
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "BOG authorization failed with {}: {}",
                status,
                body
            ));
        }
        let token: BogAccessToken = response
            .json()
            .await
            .map_err(|err| anyhow::anyhow!(format!("Failed to parse token response: {}", err)))?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentGateway for BogClient {
    #[tracing::instrument(name = "Create BOG order", skip(self, request), fields(external_order_id = request.external_order_id))]
    async fn create_order(
        &self,
        request: &GatewayOrderRequest<'_>,
    ) -> Result<GatewayOrder, anyhow::Error> {
        let token = self.get_access_token().await?;
        let url = format!("{}/ecommerce/orders", self.base_url);
        let request_body = self.build_order_request(request);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .header("Accept-Language", "ka")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "BOG order creation failed with {}: {}",
                status,
                body
            ));
        }
        let response_body: BogOrderCreateResponse = response
            .json()
            .await
            .map_err(|err| anyhow::anyhow!(format!("Failed to parse response: {}", err)))?;
        Ok(GatewayOrder {
            gateway_order_id: response_body.id,
            redirect_url: response_body.links.redirect.href,
        })
    }

    #[tracing::instrument(name = "Fetch BOG order status", skip(self))]
    async fn fetch_order_status(
        &self,
        gateway_order_id: &str,
    ) -> Result<GatewayPaymentStatus, anyhow::Error> {
        let token = self.get_access_token().await?;
        let url = format!("{}/receipt/{}", self.base_url, gateway_order_id);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "BOG receipt request failed with {}: {}",
                status,
                body
            ));
        }
        let receipt: BogReceipt = response
            .json()
            .await
            .map_err(|err| anyhow::anyhow!(format!("Failed to parse receipt: {}", err)))?;
        Ok(GatewayPaymentStatus::from_key(&receipt.order_status.key))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::{
        to_gel, BogClient, BogReceipt, GatewayBasketItem, GatewayOrderRequest,
        GatewayPaymentStatus,
    };
    use crate::configuration::BogConfig;

    fn bog_config() -> BogConfig {
        BogConfig {
            base_url: "https://api.bog.ge/payments/v1/".to_string(),
            oauth_url: "https://oauth2.bog.ge/auth/realms/bog/protocol/openid-connect/token"
                .to_string(),
            client_id: "storefront".to_string(),
            client_secret: SecretString::from("secret"),
            callback_url: "https://storefront.ge/api/payment/bog/callback".to_string(),
            success_url: "https://storefront.ge/payment/success".to_string(),
            fail_url: "https://storefront.ge/payment/fail".to_string(),
            timeout_milliseconds: 10000,
        }
    }

    #[test]
    fn test_minor_units_are_sent_in_gel() {
        assert_eq!(to_gel(2599), 25.99);
        assert_eq!(to_gel(5000), 50.0);
    }

    #[test]
    fn test_receipt_status_keys() {
        let receipt: BogReceipt = serde_json::from_value(serde_json::json!({
            "order_id": "bog-1",
            "order_status": {"key": "completed", "value": "Payment completed"},
        }))
        .unwrap();
        assert_eq!(
            GatewayPaymentStatus::from_key(&receipt.order_status.key),
            GatewayPaymentStatus::Completed
        );
        assert_eq!(
            GatewayPaymentStatus::from_key("rejected"),
            GatewayPaymentStatus::Rejected
        );
        assert_eq!(
            GatewayPaymentStatus::from_key("in_progress"),
            GatewayPaymentStatus::InProgress
        );
    }

    #[test]
    fn test_order_request_body() {
        let client = BogClient::new(&bog_config()).unwrap();
        let request = GatewayOrderRequest {
            external_order_id: "ORD-20240601-ABC234",
            total_amount: 5000,
            basket: vec![GatewayBasketItem {
                product_id: "1".to_string(),
                description: "Phone",
                quantity: 2,
                unit_price: 2500,
            }],
        };
        let body = serde_json::to_value(client.build_order_request(&request)).unwrap();
        assert_eq!(body["external_order_id"], "ORD-20240601-ABC234");
        assert_eq!(body["purchase_units"]["currency"], "GEL");
        assert_eq!(body["purchase_units"]["total_amount"], 50.0);
        assert_eq!(body["purchase_units"]["basket"][0]["unit_price"], 25.0);
        assert_eq!(body["redirect_urls"]["fail"], "https://storefront.ge/payment/fail");
        assert_eq!(
            body["callback_url"],
            "https://storefront.ge/api/payment/bog/callback"
        );
    }
}
