use chrono::{Duration, Utc};
use ledger_webhook_engine::{
    db_types::{NewCredential, TenantId},
    CredentialApi,
};

mod support;

fn sample_credential(tenant: &str, expires_in_hours: i64) -> NewCredential {
    NewCredential {
        tenant_id: TenantId::from(tenant),
        access_token: format!("AT-{tenant}-0123456789abcdef"),
        refresh_token: format!("RT-{tenant}-fedcba9876543210"),
        expires_at: Utc::now() + Duration::hours(expires_in_hours),
    }
}

#[tokio::test]
async fn upsert_and_fetch_roundtrip() {
    let db = support::prepare_test_store().await;
    let api = CredentialApi::new(db);
    let tenant = TenantId::from("4620816365001234570");

    assert!(api.credential_for_tenant(&tenant).await.unwrap().is_none());

    let stored = api.upsert(&sample_credential("4620816365001234570", 1)).await.unwrap();
    assert_eq!(stored.tenant_id, tenant);

    let fetched = api.credential_for_tenant(&tenant).await.unwrap().expect("credential should exist");
    assert_eq!(fetched.access_token, "AT-4620816365001234570-0123456789abcdef");
    assert_eq!(fetched.refresh_token, "RT-4620816365001234570-fedcba9876543210");
}

#[tokio::test]
async fn upsert_replaces_the_existing_record() {
    let db = support::prepare_test_store().await;
    let api = CredentialApi::new(db);
    let tenant = TenantId::from("company1");

    let first = api.upsert(&sample_credential("company1", 1)).await.unwrap();
    let mut renewed = sample_credential("company1", 2);
    renewed.access_token = "AT-company1-renewed-0000".to_string();
    let second = api.upsert(&renewed).await.unwrap();

    // Same row, new token material. Never two credentials for one tenant.
    assert_eq!(first.id, second.id);
    assert_eq!(second.access_token, "AT-company1-renewed-0000");
    let all = api.all_credentials().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn delete_reports_whether_a_record_was_removed() {
    let db = support::prepare_test_store().await;
    let api = CredentialApi::new(db);
    let tenant = TenantId::from("company2");

    api.upsert(&sample_credential("company2", 1)).await.unwrap();
    assert!(api.delete(&tenant).await.unwrap());
    assert!(api.credential_for_tenant(&tenant).await.unwrap().is_none());
    // The second delete has nothing left to remove.
    assert!(!api.delete(&tenant).await.unwrap());
}

#[tokio::test]
async fn expiring_before_filters_on_the_cutoff() {
    let db = support::prepare_test_store().await;
    let api = CredentialApi::new(db);

    api.upsert(&sample_credential("soon", 1)).await.unwrap();
    api.upsert(&sample_credential("later", 48)).await.unwrap();

    let cutoff = Utc::now() + Duration::hours(2);
    let expiring = api.credentials_expiring_before(cutoff).await.unwrap();
    assert_eq!(expiring.len(), 1);
    assert_eq!(expiring[0].tenant_id, TenantId::from("soon"));

    let all = api.credentials_expiring_before(Utc::now() + Duration::hours(72)).await.unwrap();
    assert_eq!(all.len(), 2);
}
