use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use chrono::{Duration, Utc};
use ledger_webhook_engine::{
    db_types::{Credential, TenantId},
    CredentialApi,
};
use oauth_tools::{OAuthApiError, TokenResponse};

use super::{
    helpers::unpack,
    mocks::{MockCredentialManager, MockOAuthClient},
};
use crate::routes::{CredentialsRoute, RefreshCredentialRoute, RevokeCredentialRoute, StoreCredentialRoute};

const REFRESH_TOKEN: &str = "RT1-9f3a7c2e55d1aa0042";

fn sample_credential(tenant: &str) -> Credential {
    Credential {
        id: 1,
        tenant_id: TenantId::from(tenant),
        access_token: "AT-2f7e1c993b1d4e0f8a6b".to_string(),
        refresh_token: REFRESH_TOKEN.to_string(),
        expires_at: Utc::now() + Duration::hours(1),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn configure_app(
    credential_manager: MockCredentialManager,
    oauth: MockOAuthClient,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let api = CredentialApi::new(credential_manager);
        let api_scope = web::scope("/api")
            .service(CredentialsRoute::<MockCredentialManager>::new())
            .service(StoreCredentialRoute::<MockCredentialManager>::new())
            .service(RevokeCredentialRoute::<MockCredentialManager, MockOAuthClient>::new())
            .service(RefreshCredentialRoute::<MockCredentialManager, MockOAuthClient>::new());
        cfg.app_data(web::Data::new(api)).app_data(web::Data::new(oauth)).service(api_scope);
    }
}

async fn call(
    req: TestRequest,
    credential_manager: MockCredentialManager,
    oauth: MockOAuthClient,
) -> (StatusCode, String) {
    let _ = env_logger::try_init();
    let app = App::new().configure(configure_app(credential_manager, oauth));
    let app = test::init_service(app).await;
    unpack(test::try_call_service(&app, req.to_request()).await).await
}

#[actix_web::test]
async fn revoking_an_unknown_tenant_makes_no_outbound_call() {
    let mut credential_manager = MockCredentialManager::new();
    credential_manager.expect_fetch_credential().returning(|_| Ok(None));
    // No expectations on the token client: any outbound call would panic the test. Note that this is also the
    // outcome of revoking the same tenant twice, since a successful revocation deletes the stored credential.
    let oauth = MockOAuthClient::new();
    let req = TestRequest::post().uri("/api/credentials/company9/revoke");
    let (status, body) = call(req, credential_manager, oauth).await;
    assert_eq!(status.as_u16(), StatusCode::NOT_FOUND.as_u16());
    assert!(body.contains("No credential is stored for tenant company9"), "was: {body}");
}

#[actix_web::test]
async fn external_rejection_keeps_the_stored_credential() {
    let mut credential_manager = MockCredentialManager::new();
    credential_manager.expect_fetch_credential().returning(|_| Ok(Some(sample_credential("company1"))));
    credential_manager.expect_delete_credential().times(0);
    let mut oauth = MockOAuthClient::new();
    oauth
        .expect_revoke_token()
        .times(1)
        .returning(|_| Err(OAuthApiError::Rejected { status: 400, message: "invalid_token".to_string() }));
    let req = TestRequest::post().uri("/api/credentials/company1/revoke");
    let (status, body) = call(req, credential_manager, oauth).await;
    assert_eq!(status.as_u16(), StatusCode::BAD_GATEWAY.as_u16());
    // The remote error body is passed through for operator diagnosis.
    assert!(body.contains("invalid_token"), "was: {body}");
}

#[actix_web::test]
async fn unreachable_platform_maps_to_gateway_timeout() {
    let mut credential_manager = MockCredentialManager::new();
    credential_manager.expect_fetch_credential().returning(|_| Ok(Some(sample_credential("company1"))));
    credential_manager.expect_delete_credential().times(0);
    let mut oauth = MockOAuthClient::new();
    oauth
        .expect_revoke_token()
        .returning(|_| Err(OAuthApiError::Unreachable("operation timed out".to_string())));
    let req = TestRequest::post().uri("/api/credentials/company1/revoke");
    let (status, body) = call(req, credential_manager, oauth).await;
    assert_eq!(status.as_u16(), StatusCode::GATEWAY_TIMEOUT.as_u16());
    assert!(body.contains("could not be reached"), "was: {body}");
}

#[actix_web::test]
async fn confirmed_revocation_deletes_the_credential() {
    let mut credential_manager = MockCredentialManager::new();
    credential_manager.expect_fetch_credential().returning(|_| Ok(Some(sample_credential("company1"))));
    credential_manager
        .expect_delete_credential()
        .withf(|tenant_id| tenant_id == &TenantId::from("company1"))
        .times(1)
        .returning(|_| Ok(true));
    let mut oauth = MockOAuthClient::new();
    oauth.expect_revoke_token().withf(|token| token == REFRESH_TOKEN).times(1).returning(|_| Ok(()));
    let req = TestRequest::post().uri("/api/credentials/company1/revoke");
    let (status, body) = call(req, credential_manager, oauth).await;
    assert!(status.is_success(), "was: {status}");
    assert!(body.contains("Credential for tenant company1 revoked."), "was: {body}");
}

#[actix_web::test]
async fn refresh_stores_the_rotated_token_pair() {
    let mut credential_manager = MockCredentialManager::new();
    credential_manager.expect_fetch_credential().returning(|_| Ok(Some(sample_credential("company1"))));
    credential_manager
        .expect_upsert_credential()
        .withf(|credential| credential.access_token == "AT-new" && credential.refresh_token == "RT-new")
        .times(1)
        .returning(|credential| {
            Ok(Credential {
                id: 1,
                tenant_id: credential.tenant_id.clone(),
                access_token: credential.access_token.clone(),
                refresh_token: credential.refresh_token.clone(),
                expires_at: credential.expires_at,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });
    let mut oauth = MockOAuthClient::new();
    oauth.expect_refresh_token().withf(|token| token == REFRESH_TOKEN).times(1).returning(|_| {
        Ok(TokenResponse {
            access_token: "AT-new".to_string(),
            refresh_token: Some("RT-new".to_string()),
            expires_in: 3600,
            token_type: Some("bearer".to_string()),
        })
    });
    let req = TestRequest::post().uri("/api/credentials/company1/refresh");
    let (status, body) = call(req, credential_manager, oauth).await;
    assert!(status.is_success(), "was: {status}");
    assert!(body.contains("refreshed"), "was: {body}");
}

#[actix_web::test]
async fn refresh_keeps_the_old_refresh_token_when_none_is_returned() {
    let mut credential_manager = MockCredentialManager::new();
    credential_manager.expect_fetch_credential().returning(|_| Ok(Some(sample_credential("company1"))));
    credential_manager
        .expect_upsert_credential()
        .withf(|credential| credential.refresh_token == REFRESH_TOKEN)
        .times(1)
        .returning(|credential| {
            Ok(Credential {
                id: 1,
                tenant_id: credential.tenant_id.clone(),
                access_token: credential.access_token.clone(),
                refresh_token: credential.refresh_token.clone(),
                expires_at: credential.expires_at,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });
    let mut oauth = MockOAuthClient::new();
    oauth.expect_refresh_token().returning(|_| {
        Ok(TokenResponse { access_token: "AT-new".to_string(), refresh_token: None, expires_in: 600, token_type: None })
    });
    let req = TestRequest::post().uri("/api/credentials/company1/refresh");
    let (status, _) = call(req, credential_manager, oauth).await;
    assert!(status.is_success(), "was: {status}");
}

#[actix_web::test]
async fn listing_masks_token_material() {
    let mut credential_manager = MockCredentialManager::new();
    credential_manager.expect_fetch_all_credentials().returning(|| Ok(vec![sample_credential("company1")]));
    let req = TestRequest::get().uri("/api/credentials");
    let (status, body) = call(req, credential_manager, MockOAuthClient::new()).await;
    assert!(status.is_success());
    assert!(body.contains("company1"), "was: {body}");
    assert!(body.contains("RT1-9f3a7c..."), "was: {body}");
    assert!(!body.contains(REFRESH_TOKEN), "full refresh token leaked: {body}");
}

#[actix_web::test]
async fn storing_a_credential_upserts_it() {
    let mut credential_manager = MockCredentialManager::new();
    credential_manager
        .expect_upsert_credential()
        .withf(|credential| credential.tenant_id == TenantId::from("company7"))
        .times(1)
        .returning(|credential| {
            Ok(Credential {
                id: 1,
                tenant_id: credential.tenant_id.clone(),
                access_token: credential.access_token.clone(),
                refresh_token: credential.refresh_token.clone(),
                expires_at: credential.expires_at,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });
    let req = TestRequest::post().uri("/api/credentials").set_json(serde_json::json!({
        "tenant_id": "company7",
        "access_token": "AT-fresh",
        "refresh_token": "RT-fresh",
        "expires_at": Utc::now() + Duration::hours(1),
    }));
    let (status, body) = call(req, credential_manager, MockOAuthClient::new()).await;
    assert!(status.is_success(), "was: {status}");
    assert!(body.contains("Credential for tenant company7 stored."), "was: {body}");
}
