//! Order creation, order timeline and review submission.

use std::time::Duration;

use reqwest::{Client, Url};
use uuid::Uuid;

use crumb_core::{
    CakeCustomization, DeliveryDetails, SelectedCakeReference, TimelineEvent, Validate,
    ValidationError,
};

use crate::error::ApiError;
use crate::locations::endpoint;
use crate::retry::retry_with_backoff;
use crate::session::Session;
use crate::types::{
    CreateOrderRequest, ErrorBody, OrderAddress, PaymentRedirect, SubmitReviewRequest,
    WireTimelineEvent,
};
use crate::RetryPolicy;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "crumb/0.1 (storefront-client)";

/// Everything checkout has gathered for one order: the cake being bought,
/// the buyer's customization and where it ships.
///
/// Validated as a whole before anything is sent; the computed layer count
/// the backend wants is derived here from the customization.
#[derive(Debug, Clone, Copy)]
pub struct OrderDraft<'a> {
    pub cake: &'a SelectedCakeReference,
    pub customization: &'a CakeCustomization,
    pub delivery: &'a DeliveryDetails,
}

impl OrderDraft<'_> {
    /// # Errors
    ///
    /// Returns [`ValidationError`] from the first invalid constituent.
    pub fn to_request(&self) -> Result<CreateOrderRequest, ValidationError> {
        self.cake.validate()?;
        self.customization.validate()?;
        self.delivery.validate()?;
        let layer_count = self.customization.layer_count().ok_or_else(|| {
            ValidationError::new("layers", "must start with a numeric layer count")
        })?;
        Ok(CreateOrderRequest {
            cake_id: self.cake.cake_id,
            flavour: self.customization.flavour.clone(),
            size: self.customization.size.clone(),
            icing: self.customization.icing.clone(),
            layer_count,
            delivery: OrderAddress {
                address: self.delivery.address.clone(),
                date: self.delivery.date,
                country: self.delivery.country.clone(),
                state: self.delivery.state.clone(),
                city: self.delivery.city.clone(),
            },
        })
    }
}

/// A buyer's review of a delivered order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub order_id: Uuid,
    pub rating: u8,
    pub comment: String,
}

impl Validate for Review {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::new(
                "rating",
                format!("must be between 1 and 5, got {}", self.rating),
            ));
        }
        Ok(())
    }
}

/// Client for the order endpoints of the storefront backend.
pub struct OrdersClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl OrdersClient {
    /// Creates a client with default connect timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] for an unparseable
    /// `base_url`.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        Self::with_timeouts(
            base_url,
            timeout_secs,
            DEFAULT_CONNECT_TIMEOUT_SECS,
            RetryPolicy::default(),
        )
    }

    /// # Errors
    ///
    /// See [`OrdersClient::new`].
    pub fn from_config(config: &crumb_core::AppConfig) -> Result<Self, ApiError> {
        Self::with_timeouts(
            &config.api_base_url,
            config.request_timeout_secs,
            config.connect_timeout_secs,
            RetryPolicy {
                max_retries: config.max_retries,
                backoff_base_ms: config.retry_backoff_base_ms,
            },
        )
    }

    /// # Errors
    ///
    /// See [`OrdersClient::new`].
    pub fn with_timeouts(
        base_url: &str,
        timeout_secs: u64,
        connect_timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        // Validate the base URL up front so later endpoint joins cannot fail.
        endpoint(base_url, "api/v1/orders")?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            retry,
        })
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Submit an order and get the payment authorization URL back.
    ///
    /// Not retried: order creation is not idempotent.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] when the session has no token; the
    ///   destination is `/checkout`.
    /// - [`ApiError::Validation`] when the draft fails local checks; nothing
    ///   is sent.
    /// - [`ApiError::Backend`] carrying the backend's `message` on rejection.
    /// - [`ApiError::Http`] on network failure or a 5xx response.
    pub async fn create_order(
        &self,
        session: &Session,
        draft: &OrderDraft<'_>,
    ) -> Result<PaymentRedirect, ApiError> {
        let token = session.require("/checkout")?;
        let request = draft.to_request()?;

        let url = self.endpoint("api/v1/orders")?;
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;
        let body = read_success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// The ordered status events for an order, oldest first.
    ///
    /// Events with malformed timestamps are kept (with no timestamp) rather
    /// than failing the timeline. Transient failures retry.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] when the session has no token; the
    ///   destination is the order's tracking page.
    /// - [`ApiError::Http`] / [`ApiError::Deserialize`] as for any read.
    pub async fn order_timeline(
        &self,
        session: &Session,
        order_id: Uuid,
    ) -> Result<Vec<TimelineEvent>, ApiError> {
        let token = session.require(&format!("/orders/{order_id}"))?;
        let url = self.endpoint(&format!("api/v1/orders/{order_id}/timeline"))?;

        let body = retry_with_backoff(self.retry.max_retries, self.retry.backoff_base_ms, || {
            self.get_success_body(&url, token)
        })
        .await?;

        let wire: Vec<WireTimelineEvent> =
            serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;
        Ok(wire.into_iter().map(WireTimelineEvent::into_event).collect())
    }

    /// Submit a review for a delivered order.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthenticated`] when the session has no token.
    /// - [`ApiError::Validation`] for an out-of-range rating; nothing is sent.
    /// - [`ApiError::Backend`] / [`ApiError::Http`] as for order creation.
    pub async fn submit_review(&self, session: &Session, review: &Review) -> Result<(), ApiError> {
        let token = session.require(&format!("/orders/{}/review", review.order_id))?;
        review.validate()?;

        let request = SubmitReviewRequest {
            order_id: review.order_id,
            rating: review.rating,
            comment: review.comment.clone(),
        };
        let url = self.endpoint("api/v1/reviews")?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;
        read_success_body(response).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        endpoint(&self.base_url, path)
    }

    async fn get_success_body(&self, url: &Url, token: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await?;
        read_success_body(response).await
    }
}

/// Read the body of a successful response, or map the failure: 5xx become
/// transient [`ApiError::Http`] (retriable), anything else surfaces the
/// backend's human-readable `message` as [`ApiError::Backend`].
async fn read_success_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    if let Err(e) = response.error_for_status_ref() {
        if status.is_server_error() {
            return Err(ApiError::Http(e));
        }
        let body = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
            |_| format!("backend rejected the request ({status})"),
            |b| b.message,
        );
        return Err(ApiError::Backend(message));
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crumb_core::Stage;

    use super::*;

    fn cake() -> SelectedCakeReference {
        SelectedCakeReference {
            cake_id: Uuid::nil(),
            name: "Red Velvet Classic".to_string(),
            vendor_name: "Ada's Ovens".to_string(),
            base_price: Decimal::new(15_000, 2),
            layer_prices: std::collections::BTreeMap::new(),
        }
    }

    fn customization() -> CakeCustomization {
        CakeCustomization::new("chocolate", "medium", "3 layers")
    }

    fn delivery() -> DeliveryDetails {
        DeliveryDetails {
            address: "12 Allen Avenue".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 9, 12).expect("valid date"),
            country: "Nigeria".to_string(),
            state: "Lagos".to_string(),
            city: "Ikeja".to_string(),
        }
    }

    fn test_client(base_url: &str) -> OrdersClient {
        OrdersClient::new(base_url, 5)
            .expect("client construction should not fail")
            .with_retry_policy(RetryPolicy {
                max_retries: 0,
                backoff_base_ms: 0,
            })
    }

    #[tokio::test]
    async fn create_order_returns_payment_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders"))
            .and(header("authorization", "Bearer token-1"))
            .and(body_partial_json(serde_json::json!({
                "layer_count": 3,
                "delivery": { "city": "Ikeja", "country": "Nigeria" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "authorization_url": "https://pay.example/checkout/abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let session = Session::with_token("token-1");
        let (cake, customization, delivery) = (cake(), customization(), delivery());
        let draft = OrderDraft {
            cake: &cake,
            customization: &customization,
            delivery: &delivery,
        };
        let redirect = client.create_order(&session, &draft).await.expect("order");
        assert_eq!(redirect.authorization_url, "https://pay.example/checkout/abc");
    }

    #[tokio::test]
    async fn create_order_without_token_is_rejected_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let (cake, customization, delivery) = (cake(), customization(), delivery());
        let draft = OrderDraft {
            cake: &cake,
            customization: &customization,
            delivery: &delivery,
        };
        let err = client
            .create_order(&Session::anonymous(), &draft)
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::Unauthenticated { ref destination } if destination == "/checkout"),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn create_order_surfaces_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "message": "vendor does not deliver to Ikeja on that date"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let session = Session::with_token("token-1");
        let (cake, customization, delivery) = (cake(), customization(), delivery());
        let draft = OrderDraft {
            cake: &cake,
            customization: &customization,
            delivery: &delivery,
        };
        let err = client.create_order(&session, &draft).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Backend(ref m) if m.contains("does not deliver")),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn create_order_rejects_invalid_draft_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/orders"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let session = Session::with_token("token-1");
        let cake = cake();
        let bad = CakeCustomization::new("chocolate", "medium", "many layers");
        let delivery = delivery();
        let draft = OrderDraft {
            cake: &cake,
            customization: &bad,
            delivery: &delivery,
        };
        let err = client.create_order(&session, &draft).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Validation(ref v) if v.field == "layers"),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn order_timeline_parses_events_and_tolerates_bad_timestamps() {
        let order_id = Uuid::nil();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/orders/{order_id}/timeline")))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "action": "pending", "timestamp": "2026-08-01T10:00:00Z" },
                { "action": "processing", "timestamp": "not-a-timestamp",
                  "description": "in the oven" }
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let session = Session::with_token("token-1");
        let events = client
            .order_timeline(&session, order_id)
            .await
            .expect("timeline");
        assert_eq!(events.len(), 2);
        assert!(events[0].timestamp.is_some());
        assert_eq!(events[1].timestamp, None);
        assert_eq!(events[1].timestamp_label(), "current status");
        assert_eq!(crumb_core::current_stage(&events), Some(Stage::Preparing));
    }

    #[tokio::test]
    async fn order_timeline_without_token_preserves_destination() {
        let order_id = Uuid::nil();
        let client = test_client("http://localhost:9");
        let err = client
            .order_timeline(&Session::anonymous(), order_id)
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::Unauthenticated { ref destination }
                if destination == &format!("/orders/{order_id}")),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn submit_review_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/reviews"))
            .and(body_partial_json(serde_json::json!({
                "rating": 5,
                "comment": "cake arrived intact"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let session = Session::with_token("token-1");
        let review = Review {
            order_id: Uuid::nil(),
            rating: 5,
            comment: "cake arrived intact".to_string(),
        };
        client
            .submit_review(&session, &review)
            .await
            .expect("review accepted");
    }

    #[tokio::test]
    async fn submit_review_rejects_out_of_range_rating() {
        let client = test_client("http://localhost:9");
        let session = Session::with_token("token-1");
        let review = Review {
            order_id: Uuid::nil(),
            rating: 6,
            comment: String::new(),
        };
        let err = client.submit_review(&session, &review).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Validation(ref v) if v.field == "rating"),
            "got: {err:?}"
        );
    }
}
