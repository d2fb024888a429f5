//! End-to-end tests for the sponsorship HTTP API.
//!
//! Drives the full router (auth middleware, timeout, trace and CORS layers)
//! against the in-memory store, a mock session validator and a manual clock.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use shelter_sponsorships::adapters::auth::MockSessionValidator;
use shelter_sponsorships::adapters::clock::ManualClock;
use shelter_sponsorships::adapters::http::{app_router, AuthState, SponsorshipAppState};
use shelter_sponsorships::adapters::memory::InMemorySponsorshipStore;
use shelter_sponsorships::domain::foundation::{DogId, PaymentMethodId, Timestamp};

const USER_TOKEN: &str = "user-token";
const OTHER_TOKEN: &str = "other-token";
const STAFF_TOKEN: &str = "staff-token";

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(InMemorySponsorshipStore::new());
        store
            .seed_dog(
                DogId::new(1).unwrap(),
                "Biscuit",
                Some("https://cdn.example.com/biscuit.jpg".to_string()),
            )
            .await;
        store
            .seed_payment_method(PaymentMethodId::new(1).unwrap(), "Card")
            .await;

        let clock = Arc::new(ManualClock::new(Timestamp::now()));
        let state = SponsorshipAppState {
            unit_of_work: store.clone(),
            reader: store,
            clock: clock.clone(),
        };
        let auth: AuthState = Arc::new(
            MockSessionValidator::new()
                .with_test_user(USER_TOKEN, "7")
                .with_test_user(OTHER_TOKEN, "8")
                .with_staff(STAFF_TOKEN, "99"),
        );

        Self {
            router: app_router(state, auth, Duration::from_secs(5)),
            clock,
        }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn subscribe(&self, token: &str, amount: i64) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/api/sponsorships/subscriptions",
                Some(token),
                Some(json!({
                    "sponsor_data": { "kind": "user" },
                    "plan_type": "subscription",
                    "dog_id": 1,
                    "amount": amount,
                    "payment_method_id": 1,
                    "frequency": "monthly"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }
}

fn guest_one_time(amount: i64) -> Value {
    json!({
        "sponsor_data": {
            "kind": "guest",
            "first_name": "Malee",
            "last_name": "Suk",
            "email": "Malee@Example.com",
            "phone": "0812345678"
        },
        "plan_type": "one-time",
        "dog_id": 1,
        "amount": amount,
        "payment_method_id": 1,
        "update": { "enabled": true, "channel": "email", "frequency": "monthly" }
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Subscription lifecycle
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn subscription_can_be_cancelled_and_reactivated_within_its_period() {
    let app = TestApp::new().await;
    let created = app.subscribe(USER_TOKEN, 1000).await;
    let subscription_id = created["subscription_id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            "POST",
            &format!("/api/subscriptions/{}/cancel", subscription_id),
            Some(USER_TOKEN),
            Some(json!({ "cancel_at_period_end": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["subscription"]["status"], "cancelled");

    app.clock.advance_days(10);
    let (status, body) = app
        .send(
            "POST",
            &format!("/api/subscriptions/{}/reactivate", subscription_id),
            Some(USER_TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["subscription"]["status"], "active");
    assert_eq!(body["subscription"]["cancel_at_period_end"], false);
}

#[tokio::test]
async fn reactivation_after_the_paid_period_conflicts() {
    let app = TestApp::new().await;
    let created = app.subscribe(USER_TOKEN, 1000).await;
    let subscription_id = created["subscription_id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            "POST",
            &format!("/api/subscriptions/{}/cancel", subscription_id),
            Some(USER_TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    app.clock.advance_days(40);
    let (status, body) = app
        .send(
            "POST",
            &format!("/api/subscriptions/{}/reactivate", subscription_id),
            Some(USER_TOKEN),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "PERIOD_ENDED");
    assert!(body["details"]["current_period_end"].is_string());
}

#[tokio::test]
async fn another_account_cannot_see_the_subscription() {
    let app = TestApp::new().await;
    let created = app.subscribe(USER_TOKEN, 1000).await;
    let subscription_id = created["subscription_id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            "POST",
            &format!("/api/subscriptions/{}/cancel", subscription_id),
            Some(OTHER_TOKEN),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn guests_cannot_subscribe() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/sponsorships/subscriptions",
            None,
            Some(json!({
                "sponsor_data": { "kind": "user", "user_id": 7 },
                "plan_type": "subscription",
                "dog_id": 1,
                "amount": 1000,
                "payment_method_id": 1,
                "frequency": "monthly"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);
}

#[tokio::test]
async fn signed_in_caller_cannot_subscribe_for_a_guest() {
    let app = TestApp::new().await;

    let mut request = guest_one_time(1000);
    request["plan_type"] = json!("subscription");
    request["frequency"] = json!("monthly");
    let (status, body) = app
        .send("POST", "/api/sponsorships/subscriptions", Some(USER_TOKEN), Some(request))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["details"]["field"], "sponsor.kind");

    let (_, mine) = app
        .send("GET", "/api/me/sponsorships", Some(USER_TOKEN), None)
        .await;
    assert_eq!(mine["items"].as_array().map(Vec::len), Some(0));
}

// ════════════════════════════════════════════════════════════════════════════
// One-time sponsorships and the caller's listing
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn guest_one_time_sponsorship_writes_a_payment() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send("POST", "/api/sponsorships/one-time", None, Some(guest_one_time(500)))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body["sponsorship_id"].as_i64().unwrap() > 0);
    assert!(body["payment_id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn invalid_amount_is_a_validation_error() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send("POST", "/api/sponsorships/one-time", None, Some(guest_one_time(0)))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn my_sponsorships_lists_items_and_totals() {
    let app = TestApp::new().await;
    app.subscribe(USER_TOKEN, 1000).await;
    let (status, _) = app
        .send(
            "POST",
            "/api/sponsorships/one-time",
            Some(USER_TOKEN),
            Some(json!({
                "sponsor_data": { "kind": "user" },
                "plan_type": "one-time",
                "dog_id": 1,
                "amount": 250,
                "payment_method_id": 1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.send("GET", "/api/me/sponsorships", Some(USER_TOKEN), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["dog_name"], "Biscuit");
    assert_eq!(body["summary"]["total_one_time"], 250);
    assert_eq!(body["summary"]["total_subscription"], 1000);
    assert_eq!(body["summary"]["total_all"], 1250);

    let (_, other) = app.send("GET", "/api/me/sponsorships", Some(OTHER_TOKEN), None).await;
    assert!(other["items"].as_array().unwrap().is_empty());
    assert_eq!(other["summary"]["total_all"], 0);
}

#[tokio::test]
async fn my_sponsorships_requires_a_session() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/api/me/sponsorships", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn unknown_token_is_rejected_before_routing() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send("GET", "/api/me/sponsorships", Some("stolen"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_ERROR");
}

// ════════════════════════════════════════════════════════════════════════════
// Staff endpoints
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn staff_can_list_and_soft_delete_sponsorships() {
    let app = TestApp::new().await;
    let (_, created) = app
        .send("POST", "/api/sponsorships/one-time", None, Some(guest_one_time(500)))
        .await;
    let sponsorship_id = created["sponsorship_id"].as_i64().unwrap();

    let (status, body) = app.send("GET", "/api/admin/sponsorships", Some(STAFF_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sponsor"]["email"], "malee@example.com");
    assert_eq!(items[0]["sponsorship_payments"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(
            "DELETE",
            &format!("/api/admin/sponsorships/{}", sponsorship_id),
            Some(STAFF_TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted_by_staff_id"], "99");

    let (_, body) = app.send("GET", "/api/admin/sponsorships", Some(STAFF_TOKEN), None).await;
    assert!(body["items"].as_array().unwrap().is_empty());

    let (status, _) = app
        .send(
            "DELETE",
            &format!("/api/admin/sponsorships/{}", sponsorship_id),
            Some(STAFF_TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_cannot_reach_staff_endpoints() {
    let app = TestApp::new().await;

    let (status, _) = app.send("GET", "/api/admin/sponsorships", Some(USER_TOKEN), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("DELETE", "/api/admin/sponsorships/1", Some(USER_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn staff_sessions_cannot_use_account_endpoints() {
    let app = TestApp::new().await;

    let (status, _) = app.send("GET", "/api/me/sponsorships", Some(STAFF_TOKEN), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_probe_needs_no_session() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
