use async_trait::async_trait;
use mainsdesk_core::GatewayConfig;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use super::{
    CreateOrderRequest, CreatePlanRequest, CreateSubscriptionRequest, GatewayError, GatewayOrder,
    GatewayPlan, GatewaySubscription, PaymentGateway,
};

#[derive(Clone, Debug)]
pub struct RazorpayClientConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
    pub timeout_seconds: u64,
}

impl From<&GatewayConfig> for RazorpayClientConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            api_base: config.api_base.clone(),
            timeout_seconds: config.timeout_seconds,
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Razorpay REST client (basic auth with key id and key secret)
#[derive(Clone)]
pub struct RazorpayClient {
    http_client: Client,
    config: RazorpayClientConfig,
}

impl RazorpayClient {
    pub fn new(config: RazorpayClientConfig) -> Result<Self, GatewayError> {
        if config.key_id.is_empty() || config.key_secret.is_empty() {
            return Err(GatewayError::Config(
                "key id and key secret are required".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("MainsDesk-Payments/1.0")
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(self.url(path))
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => (
                body.error.code,
                body.error
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            ),
            Err(_) => (None, text),
        };

        tracing::warn!(
            status = status.as_u16(),
            code = ?code,
            path,
            "Payment gateway rejected request"
        );

        Err(GatewayError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    #[tracing::instrument(skip(self, request), fields(gateway.operation = "create_order", amount = request.amount))]
    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let order: GatewayOrder = self.post("/v1/orders", &request).await?;
        tracing::info!(order_id = %order.id, "Gateway order created");
        Ok(order)
    }

    #[tracing::instrument(skip(self, request), fields(gateway.operation = "create_subscription", plan_id = %request.plan_id))]
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<GatewaySubscription, GatewayError> {
        let subscription: GatewaySubscription = self.post("/v1/subscriptions", &request).await?;
        tracing::info!(subscription_id = %subscription.id, "Gateway subscription created");
        Ok(subscription)
    }

    #[tracing::instrument(skip(self, request), fields(gateway.operation = "create_plan", period = %request.period))]
    async fn create_plan(&self, request: CreatePlanRequest) -> Result<GatewayPlan, GatewayError> {
        let plan: GatewayPlan = self.post("/v1/plans", &request).await?;
        tracing::info!(gateway_plan_id = %plan.id, "Gateway plan created");
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{CheckoutNotes, PlanItem, PlanNotes};
    use mockito::Matcher;
    use serde_json::json;

    // base64("rzp_test_key:rzp_test_secret")
    const BASIC_AUTH: &str = "Basic cnpwX3Rlc3Rfa2V5OnJ6cF90ZXN0X3NlY3JldA==";

    fn client(base: String) -> RazorpayClient {
        RazorpayClient::new(RazorpayClientConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: "rzp_test_secret".to_string(),
            api_base: base,
            timeout_seconds: 5,
        })
        .expect("client")
    }

    fn notes(kind: &str) -> CheckoutNotes {
        CheckoutNotes {
            user_id: "2f0c9a4e-31d5-4c55-9a84-5b2a1e7d9c10".to_string(),
            supabase_plan_id: "P1".to_string(),
            kind: kind.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_order_sends_paise_and_notes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/orders")
            .match_header("authorization", BASIC_AUTH)
            .match_body(Matcher::Json(json!({
                "amount": 49900,
                "currency": "INR",
                "receipt": "rcpt_1",
                "notes": {
                    "user_id": "2f0c9a4e-31d5-4c55-9a84-5b2a1e7d9c10",
                    "supabase_plan_id": "P1",
                    "type": "one_time"
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"order_Nk1","entity":"order","amount":49900,"currency":"INR","receipt":"rcpt_1","status":"created"}"#,
            )
            .create_async()
            .await;

        let order = client(server.url())
            .create_order(CreateOrderRequest {
                amount: 49900,
                currency: "INR".to_string(),
                receipt: "rcpt_1".to_string(),
                notes: notes("one_time"),
            })
            .await
            .unwrap();

        assert_eq!(order.id, "order_Nk1");
        assert_eq!(order.amount, 49900);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_subscription() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/subscriptions")
            .match_body(Matcher::PartialJson(json!({
                "plan_id": "plan_Abc",
                "total_count": 12,
                "customer_notify": true,
                "notes": { "type": "recurring" }
            })))
            .with_status(200)
            .with_body(r#"{"id":"sub_Xyz","plan_id":"plan_Abc","status":"created","short_url":"https://rzp.io/i/x"}"#)
            .create_async()
            .await;

        let sub = client(server.url())
            .create_subscription(CreateSubscriptionRequest {
                plan_id: "plan_Abc".to_string(),
                total_count: 12,
                customer_notify: true,
                notes: notes("recurring"),
            })
            .await
            .unwrap();

        assert_eq!(sub.id, "sub_Xyz");
        assert_eq!(sub.status.as_deref(), Some("created"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_plan() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/plans")
            .match_body(Matcher::PartialJson(json!({
                "period": "monthly",
                "interval": 1,
                "item": { "name": "Mains Monthly", "amount": 99900, "currency": "INR" }
            })))
            .with_status(200)
            .with_body(r#"{"id":"plan_New","entity":"plan","period":"monthly","interval":1}"#)
            .create_async()
            .await;

        let plan = client(server.url())
            .create_plan(CreatePlanRequest {
                period: "monthly".to_string(),
                interval: 1,
                item: PlanItem {
                    name: "Mains Monthly".to_string(),
                    amount: 99900,
                    currency: "INR".to_string(),
                    description: None,
                },
                notes: PlanNotes {
                    supabase_plan_id: "P1".to_string(),
                },
            })
            .await
            .unwrap();

        assert_eq!(plan.id, "plan_New");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/orders")
            .with_status(400)
            .with_body(r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"The amount must be atleast INR 1.00"}}"#)
            .create_async()
            .await;

        let err = client(server.url())
            .create_order(CreateOrderRequest {
                amount: 10,
                currency: "INR".to_string(),
                receipt: "rcpt_2".to_string(),
                notes: notes("one_time"),
            })
            .await
            .unwrap_err();

        match err {
            GatewayError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("BAD_REQUEST_ERROR"));
                assert!(message.contains("atleast"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = RazorpayClient::new(RazorpayClientConfig {
            key_id: String::new(),
            key_secret: "s".to_string(),
            api_base: "https://api.razorpay.com".to_string(),
            timeout_seconds: 5,
        });
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_gateway_errors_map_to_server_errors() {
        use mainsdesk_core::{AppError, ErrorMetadata};
        let err: AppError = GatewayError::Api {
            status: 400,
            code: None,
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(err.http_status_code(), 500);
        assert!(matches!(err, AppError::PaymentGateway(_)));
    }
}
