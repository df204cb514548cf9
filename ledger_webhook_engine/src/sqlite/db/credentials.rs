//! SQLite database operations for the per-tenant credential store.
//!
//! Generally clients should never call these methods directly, and prefer to use the [`CredentialManagement`]
//! trait methods that are implemented on the [`SqliteDatabase`](crate::SqliteDatabase) struct instead.
//!
//! [`CredentialManagement`]: crate::traits::CredentialManagement

use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Credential, NewCredential, TenantId},
    traits::CredentialApiError,
};

const CREDENTIAL_COLUMNS: &str = "id, tenant_id, access_token, refresh_token, expires_at, created_at, updated_at";

pub async fn upsert_credential(
    credential: &NewCredential,
    conn: &mut SqliteConnection,
) -> Result<Credential, CredentialApiError> {
    sqlx::query(
        r#"INSERT INTO credentials (tenant_id, access_token, refresh_token, expires_at) VALUES (?, ?, ?, ?)
        ON CONFLICT(tenant_id) DO UPDATE SET
            access_token = excluded.access_token,
            refresh_token = excluded.refresh_token,
            expires_at = excluded.expires_at,
            updated_at = CURRENT_TIMESTAMP"#,
    )
    .bind(credential.tenant_id.as_str())
    .bind(&credential.access_token)
    .bind(&credential.refresh_token)
    .bind(credential.expires_at)
    .execute(&mut *conn)
    .await?;
    debug!("🗃️ Credential for tenant {} has been saved", credential.tenant_id);
    fetch_credential(&credential.tenant_id, conn)
        .await?
        .ok_or_else(|| CredentialApiError::DatabaseError("Upserted credential could not be read back".to_string()))
}

pub async fn fetch_credential(
    tenant_id: &TenantId,
    conn: &mut SqliteConnection,
) -> Result<Option<Credential>, CredentialApiError> {
    let q = format!("SELECT {CREDENTIAL_COLUMNS} FROM credentials WHERE tenant_id = ?");
    let credential = sqlx::query_as::<_, Credential>(&q).bind(tenant_id.as_str()).fetch_optional(&mut *conn).await?;
    Ok(credential)
}

pub async fn fetch_all_credentials(conn: &mut SqliteConnection) -> Result<Vec<Credential>, CredentialApiError> {
    let q = format!("SELECT {CREDENTIAL_COLUMNS} FROM credentials ORDER BY tenant_id");
    let credentials = sqlx::query_as::<_, Credential>(&q).fetch_all(&mut *conn).await?;
    Ok(credentials)
}

pub async fn fetch_credentials_expiring_before(
    cutoff: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Credential>, CredentialApiError> {
    let q = format!("SELECT {CREDENTIAL_COLUMNS} FROM credentials WHERE expires_at <= ? ORDER BY expires_at");
    let credentials = sqlx::query_as::<_, Credential>(&q).bind(cutoff).fetch_all(&mut *conn).await?;
    Ok(credentials)
}

pub async fn delete_credential(tenant_id: &TenantId, conn: &mut SqliteConnection) -> Result<bool, CredentialApiError> {
    let res =
        sqlx::query("DELETE FROM credentials WHERE tenant_id = ?").bind(tenant_id.as_str()).execute(&mut *conn).await?;
    let removed = res.rows_affected() > 0;
    if removed {
        debug!("🗃️ Credential for tenant {tenant_id} has been deleted");
    }
    Ok(removed)
}
