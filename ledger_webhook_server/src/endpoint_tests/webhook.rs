use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::Utc;
use ledger_webhook_engine::{db_types::WebhookEvent, events::EventProducers, EventApi};
use lwg_common::Secret;

use super::{helpers::unpack, mocks::MockEventManager};
use crate::{
    helpers::calculate_hmac,
    middleware::HmacMiddlewareFactory,
    routes::{EventsRoute, WebhookRoute},
};

const SECRET: &str = "abc123";
const SIGNATURE_HEADER: &str = "x-webhook-signature";
const PAYLOAD: &str = r#"{"x":1}"#;

fn configure_app(hmac_checks: bool, event_manager: MockEventManager) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = EventApi::new(event_manager, EventProducers::default());
        let webhook_scope = web::scope("/webhook")
            .wrap(HmacMiddlewareFactory::new(SIGNATURE_HEADER, Secret::new(SECRET.to_string()), hmac_checks))
            .service(WebhookRoute::<MockEventManager>::new());
        let api_scope = web::scope("/api").service(EventsRoute::<MockEventManager>::new());
        cfg.app_data(web::Data::new(api)).service(webhook_scope).service(api_scope);
    }
}

async fn post_webhook(
    payload: &'static str,
    signature: Option<&str>,
    hmac_checks: bool,
    event_manager: MockEventManager,
) -> (StatusCode, String) {
    let _ = env_logger::try_init();
    let mut req = TestRequest::post().uri("/webhook").set_payload(payload);
    if let Some(signature) = signature {
        req = req.insert_header((SIGNATURE_HEADER, signature));
    }
    let app = App::new().configure(configure_app(hmac_checks, event_manager));
    let app = test::init_service(app).await;
    unpack(test::try_call_service(&app, req.to_request()).await).await
}

fn recording_event_manager(expected_payload: &'static str) -> MockEventManager {
    let mut event_manager = MockEventManager::new();
    event_manager
        .expect_insert_event()
        .withf(move |payload| payload == expected_payload)
        .times(1)
        .returning(|payload| Ok(WebhookEvent { id: 1, payload: payload.to_string(), received_at: Utc::now() }));
    event_manager
}

#[actix_web::test]
async fn correctly_signed_delivery_is_accepted_and_recorded() {
    let signature = calculate_hmac(SECRET, PAYLOAD.as_bytes());
    let (status, body) = post_webhook(PAYLOAD, Some(&signature), true, recording_event_manager(PAYLOAD)).await;
    assert!(status.is_success(), "was: {status}");
    assert!(body.contains("Webhook delivery recorded."), "was: {body}");
}

#[actix_web::test]
async fn garbage_signature_is_rejected_and_nothing_is_stored() {
    // No expectations on the mock: any append would panic the test.
    let event_manager = MockEventManager::new();
    let (status, body) = post_webhook(PAYLOAD, Some("garbage"), true, event_manager).await;
    assert_eq!(status.as_u16(), StatusCode::UNAUTHORIZED.as_u16());
    assert!(body.contains("Invalid webhook signature"), "was: {body}");
}

#[actix_web::test]
async fn missing_signature_fails_closed() {
    let event_manager = MockEventManager::new();
    let (status, body) = post_webhook(PAYLOAD, None, true, event_manager).await;
    assert_eq!(status.as_u16(), StatusCode::UNAUTHORIZED.as_u16());
    assert!(body.contains("No webhook signature found"), "was: {body}");
}

#[actix_web::test]
async fn signature_over_a_different_payload_is_rejected() {
    let event_manager = MockEventManager::new();
    let signature = calculate_hmac(SECRET, br#"{"x":2}"#);
    let (status, _) = post_webhook(PAYLOAD, Some(&signature), true, event_manager).await;
    assert_eq!(status.as_u16(), StatusCode::UNAUTHORIZED.as_u16());
}

#[actix_web::test]
async fn empty_payload_is_signed_and_accepted_like_any_other() {
    let signature = calculate_hmac(SECRET, b"");
    let (status, _) = post_webhook("", Some(&signature), true, recording_event_manager("")).await;
    assert!(status.is_success(), "was: {status}");
}

#[actix_web::test]
async fn disabled_checks_let_unsigned_deliveries_through() {
    let (status, _) = post_webhook(PAYLOAD, None, false, recording_event_manager(PAYLOAD)).await;
    assert!(status.is_success(), "was: {status}");
}

#[actix_web::test]
async fn event_listing_returns_entries_in_arrival_order() {
    let mut event_manager = MockEventManager::new();
    event_manager.expect_fetch_all_events().returning(|| {
        Ok(vec![
            WebhookEvent { id: 1, payload: "first".to_string(), received_at: Utc::now() },
            WebhookEvent { id: 2, payload: "second".to_string(), received_at: Utc::now() },
        ])
    });
    let app = App::new().configure(configure_app(true, event_manager));
    let app = test::init_service(app).await;
    let req = TestRequest::get().uri("/api/events").to_request();
    let (status, body) = unpack(test::try_call_service(&app, req).await).await;
    assert!(status.is_success());
    let first = body.find("first").expect("first payload missing");
    let second = body.find("second").expect("second payload missing");
    assert!(first < second, "was: {body}");
}
