//! HTTP surface of mounted form sessions

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use greenkenya::{AppState, FormRegistry, router};
use greenkenya_notification::DisabledChannel;
use greenkenya_submission::{DeliveryChannel, DeliveryError, Mailbox, OutboundMessage, Timing};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

struct AcceptingChannel;

#[async_trait]
impl DeliveryChannel for AcceptingChannel {
    async fn send(&self, _message: &OutboundMessage) -> Result<(), DeliveryError> {
        Ok(())
    }
}

fn app(channel: Arc<dyn DeliveryChannel>) -> Router {
    router(AppState {
        forms: FormRegistry::new(channel, Mailbox::default(), Timing::default()),
    })
}

async fn call(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn mount(app: &Router, kind: &str) -> String {
    let (status, view) = call(app, Method::POST, "/sessions", &format!("kind={kind}")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["status"], "idle");

    view["id"].as_str().unwrap().to_owned()
}

const AMINA: &str = "name=Amina&email=a%40x.com&subject=Volunteering&message=I%27d+like+to+help";

#[tokio::test]
async fn test_health() {
    let (status, body) = call(&app(Arc::new(DisabledChannel)), Method::GET, "/health", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn test_contact_success_resets_form() {
    let app = app(Arc::new(AcceptingChannel));
    let id = mount(&app, "contact").await;

    let (status, view) = call(&app, Method::POST, &format!("/sessions/{id}/submit"), AMINA).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "success");
    assert_eq!(view["message"], "Message sent successfully! We'll reply soon.");
    assert_eq!(view["form"]["name"], "");
    assert_eq!(view["form"]["message"], "");

    tokio::time::sleep(Duration::from_millis(3100)).await;

    let (_, view) = call(&app, Method::GET, &format!("/sessions/{id}"), "").await;
    assert_eq!(view["status"], "idle");
    assert_eq!(view["message"], Value::Null);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_delivery_offers_mailto_fallback() {
    let app = app(Arc::new(DisabledChannel));
    let id = mount(&app, "contact").await;

    let (status, view) = call(&app, Method::POST, &format!("/sessions/{id}/submit"), AMINA).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "error");
    assert_eq!(view["message"], "Sending failed. Opening email client...");
    assert_eq!(view["fallback_link"], Value::Null);
    assert_eq!(view["form"]["name"], "Amina");

    tokio::time::sleep(Duration::from_millis(2100)).await;

    let (_, view) = call(&app, Method::GET, &format!("/sessions/{id}"), "").await;
    assert_eq!(view["status"], "fallback_offered");

    let link = view["fallback_link"].as_str().unwrap();
    assert!(link.starts_with("mailto:greenkenyainitiative985@gmail.com?subject=Volunteering"));
    assert!(link.contains("Amina"));
}

#[tokio::test]
async fn test_membership_without_category_is_rejected_inline() {
    let app = app(Arc::new(AcceptingChannel));
    let id = mount(&app, "membership").await;

    let body = "name=Wanjiru&email=wanjiru%40example.com&phone=%2B254+722+000+000\
        &location=Watamu&message=Mangroves&interests=Tree+Planting&interests=Fundraising";
    let (status, view) = call(&app, Method::POST, &format!("/sessions/{id}/submit"), body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(view["status"], "idle");
    assert_eq!(view["notice"], "Please select a membership category.");
    assert_eq!(view["form"]["location"], "Watamu");
}

#[tokio::test]
async fn test_membership_application_is_delivered() {
    let app = app(Arc::new(AcceptingChannel));
    let id = mount(&app, "membership").await;

    let body = "name=Wanjiru&email=wanjiru%40example.com&phone=%2B254+722+000+000\
        &location=Watamu&message=Mangroves&category=ambassador\
        &interests=Tree+Planting&interests=Fundraising";
    let (status, view) = call(&app, Method::POST, &format!("/sessions/{id}/submit"), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "success");
    assert_eq!(view["message"], "Message sent successfully! We'll reply soon.");
    assert_eq!(view["form"]["interests"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_kind_and_session() {
    let app = app(Arc::new(DisabledChannel));

    let (status, body) = call(&app, Method::POST, "/sessions", "kind=newsletter").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("contact, membership, chat"));

    let (status, _) = call(&app, Method::GET, "/sessions/01JUNKNOWN", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::POST, "/sessions/01JUNKNOWN/submit", AMINA).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unmount() {
    let app = app(Arc::new(DisabledChannel));
    let id = mount(&app, "chat").await;

    let (status, _) = call(&app, Method::DELETE, &format!("/sessions/{id}"), "").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::GET, &format!("/sessions/{id}"), "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
