//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will
//! cause the current worker to stop processing new requests. Signature verification and payload framing are pure
//! computation and safe to do inline; anything that does I/O (the stores, the outbound token service calls) is
//! expressed as a future and awaited, so worker threads keep serving other requests while it is in flight.
use actix_web::{get, web, HttpResponse, Responder};
use ledger_webhook_engine::{
    db_types::{NewCredential, TenantId},
    traits::{CredentialManagement, EventManagement},
    CredentialApi,
    EventApi,
};
use log::*;
use oauth_tools::TokenExchange;

use crate::{
    data_objects::{CredentialSummary, JsonResponse},
    errors::ServerError,
    integrations::oauth::{refresh_tenant_credential, revoke_tenant_credential},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(webhook => Post "" impl EventManagement);
/// Route handler for inbound webhook deliveries.
///
/// By the time this handler runs, the HMAC middleware has already verified the signature over the exact bytes of
/// the request body; unverified payloads never reach this point. The body is recorded as-is and subscribers are
/// notified on their own tasks, so the 200 acknowledgement goes back well within the platform's delivery timeout
/// regardless of what downstream processing does with the event.
///
/// The accepted-path response carries no internal detail; a store failure responds 500 with a generic message.
pub async fn webhook<B>(body: web::Bytes, api: web::Data<EventApi<B>>) -> Result<HttpResponse, ServerError>
where B: EventManagement {
    trace!("🔔️ Received webhook delivery ({} bytes)", body.len());
    let payload = String::from_utf8_lossy(body.as_ref());
    let event = api.record_event(payload.as_ref()).await.map_err(|e| {
        warn!("🔔️ Could not record webhook delivery. {e}");
        ServerError::BackendError("Could not record webhook delivery.".to_string())
    })?;
    debug!("🔔️ Webhook delivery recorded as event #{}", event.id);
    Ok(HttpResponse::Ok().json(JsonResponse::success("Webhook delivery recorded.")))
}

//----------------------------------------------   Events  ----------------------------------------------------
route!(events => Get "/events" impl EventManagement);
/// Route handler for the recorded webhook events, in arrival order. Used for display and audit.
pub async fn events<B>(api: web::Data<EventApi<B>>) -> Result<HttpResponse, ServerError>
where B: EventManagement {
    debug!("💻️ GET events");
    let events = api.all_events().await.map_err(|e| {
        debug!("💻️ Could not fetch events. {e}");
        ServerError::BackendError(e.to_string())
    })?;
    Ok(HttpResponse::Ok().json(events))
}

//----------------------------------------------   Credentials  ----------------------------------------------------
route!(credentials => Get "/credentials" impl CredentialManagement);
/// Route handler for listing connected tenants. Token material is masked; full secrets never leave the store
/// through this route.
pub async fn credentials<B>(api: web::Data<CredentialApi<B>>) -> Result<HttpResponse, ServerError>
where B: CredentialManagement {
    debug!("💻️ GET credentials");
    let credentials = api.all_credentials().await.map_err(|e| {
        debug!("💻️ Could not fetch credentials. {e}");
        ServerError::BackendError(e.to_string())
    })?;
    let summaries = credentials.iter().map(CredentialSummary::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(summaries))
}

route!(store_credential => Post "/credentials" impl CredentialManagement);
/// Route handler for persisting a tenant's grant after the OAuth2 authorization handshake completes.
///
/// The handshake itself is the authorization collaborator's concern; this route is its hand-off point. Posting a
/// credential for a tenant that already has one replaces it, so there is never more than one grant per tenant.
pub async fn store_credential<B>(
    body: web::Json<NewCredential>,
    api: web::Data<CredentialApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CredentialManagement,
{
    let credential = body.into_inner();
    debug!("💻️ POST credential for tenant {}", credential.tenant_id);
    let stored = api.upsert(&credential).await.map_err(|e| {
        warn!("💻️ Could not store credential for tenant {}. {e}", credential.tenant_id);
        ServerError::BackendError(e.to_string())
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Credential for tenant {} stored.", stored.tenant_id))))
}

route!(revoke_credential => Post "/credentials/{tenant_id}/revoke" impl CredentialManagement, TokenExchange);
/// Route handler for revoking a tenant's grant.
///
/// The platform's revocation endpoint is asked first; only after it confirms is the local record deleted, and the
/// caller receives the full error payload when it does not. Calling this twice for the same tenant reports 404 on
/// the second call, since the credential is gone after the first succeeds.
pub async fn revoke_credential<BCred, COauth>(
    path: web::Path<TenantId>,
    api: web::Data<CredentialApi<BCred>>,
    oauth: web::Data<COauth>,
) -> Result<HttpResponse, ServerError>
where
    BCred: CredentialManagement,
    COauth: TokenExchange,
{
    let tenant_id = path.into_inner();
    info!("💻️ POST revoke credential for tenant {tenant_id}");
    revoke_tenant_credential(&tenant_id, api.as_ref(), oauth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Credential for tenant {tenant_id} revoked."))))
}

route!(refresh_credential => Post "/credentials/{tenant_id}/refresh" impl CredentialManagement, TokenExchange);
/// Route handler for refreshing a tenant's access token on demand. The background worker does the same thing on a
/// schedule; this route exists for operators who don't want to wait for it.
pub async fn refresh_credential<BCred, COauth>(
    path: web::Path<TenantId>,
    api: web::Data<CredentialApi<BCred>>,
    oauth: web::Data<COauth>,
) -> Result<HttpResponse, ServerError>
where
    BCred: CredentialManagement,
    COauth: TokenExchange,
{
    let tenant_id = path.into_inner();
    info!("💻️ POST refresh credential for tenant {tenant_id}");
    let updated = refresh_tenant_credential(&tenant_id, api.as_ref(), oauth.as_ref()).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!(
        "Credential for tenant {tenant_id} refreshed. Access token valid until {}.",
        updated.expires_at
    ))))
}
