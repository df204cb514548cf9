use chrono::{Duration, Utc};
use ledger_webhook_engine::{CredentialApi, SqliteDatabase};
use log::*;
use oauth_tools::OAuthApi;
use tokio::task::JoinHandle;

use crate::integrations::oauth::refresh_tenant_credential;

/// Starts the credential refresh worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Every `interval`, the worker fetches the credentials whose access token expires within `margin` and refreshes
/// each one against the platform's token endpoint. A failed refresh is logged and retried on the next tick; it
/// never takes the worker down.
pub fn start_refresh_worker(
    db: SqliteDatabase,
    oauth: OAuthApi,
    interval: Duration,
    margin: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = interval.to_std().unwrap_or(std::time::Duration::from_secs(900));
        let mut timer = tokio::time::interval(period);
        let api = CredentialApi::new(db);
        info!("🕰️ Credential refresh worker started");
        loop {
            timer.tick().await;
            debug!("🕰️ Running credential refresh job");
            let cutoff = Utc::now() + margin;
            let expiring = match api.credentials_expiring_before(cutoff).await {
                Ok(credentials) => credentials,
                Err(e) => {
                    error!("🕰️ Error fetching expiring credentials: {e}");
                    continue;
                },
            };
            if expiring.is_empty() {
                continue;
            }
            info!("🕰️ {} credential(s) are due for a refresh", expiring.len());
            for credential in expiring {
                match refresh_tenant_credential(&credential.tenant_id, &api, &oauth).await {
                    Ok(updated) => {
                        info!(
                            "🕰️ Refreshed credential for tenant {}; valid until {}",
                            updated.tenant_id, updated.expires_at
                        );
                    },
                    Err(e) => {
                        error!("🕰️ Could not refresh credential for tenant {}: {e}", credential.tenant_id);
                    },
                }
            }
        }
    })
}
