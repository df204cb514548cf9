use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{
    dev::{Server, Service},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpServer,
};
use futures::{future::ok, FutureExt};
use ledger_webhook_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    CredentialApi,
    EventApi,
    SqliteDatabase,
};
use log::{debug, info, warn};
use oauth_tools::OAuthApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    helpers::get_remote_ip,
    middleware::HmacMiddlewareFactory,
    refresh_worker::start_refresh_worker,
    routes::{
        health,
        CredentialsRoute,
        EventsRoute,
        RefreshCredentialRoute,
        RevokeCredentialRoute,
        StoreCredentialRoute,
        WebhookRoute,
    },
};

const EVENT_BUFFER_SIZE: usize = 128;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Connected to database at {}", db.url());
    let oauth =
        OAuthApi::new(config.oauth_config.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if config.webhook_config.hmac_checks && config.webhook_config.hmac_secret.is_empty() {
        warn!("🚨️ The webhook shared secret is empty. No delivery will verify until LWG_WEBHOOK_SECRET is set.");
    }

    let mut hooks = EventHooks::default();
    hooks.on_webhook_received(|ev| {
        Box::pin(async move {
            debug!("📬️ Webhook event #{} is ready for downstream processing", ev.event.id);
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;

    start_refresh_worker(db.clone(), oauth.clone(), config.refresh_interval, config.refresh_margin);

    let srv = create_server_instance(config, db, oauth, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    oauth: OAuthApi,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let credentials_api = CredentialApi::new(db.clone());
        let events_api = EventApi::new(db.clone(), producers.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("lwg::access_log"))
            .app_data(web::Data::new(credentials_api))
            .app_data(web::Data::new(events_api))
            .app_data(web::Data::new(oauth.clone()));
        let api_scope = web::scope("/api")
            .service(EventsRoute::<SqliteDatabase>::new())
            .service(CredentialsRoute::<SqliteDatabase>::new())
            .service(StoreCredentialRoute::<SqliteDatabase>::new())
            .service(RevokeCredentialRoute::<SqliteDatabase, OAuthApi>::new())
            .service(RefreshCredentialRoute::<SqliteDatabase, OAuthApi>::new());
        let use_x_forwarded_for = config.use_x_forwarded_for;
        let use_forwarded = config.use_forwarded;
        let whitelist = config.webhook_config.whitelist.clone();
        // The whitelist check is registered after the HMAC middleware so it runs first: a request from an
        // unlisted peer is turned away before any signature work is done.
        let webhook_scope = web::scope("/webhook")
            .wrap(HmacMiddlewareFactory::new(
                &config.webhook_config.hmac_header,
                config.webhook_config.hmac_secret.clone(),
                config.webhook_config.hmac_checks,
            ))
            .wrap_fn(move |req, srv| {
                let peer_ip = get_remote_ip(req.request(), use_x_forwarded_for, use_forwarded);
                let whitelisted = match (peer_ip, &whitelist) {
                    (Some(ip), Some(whitelist)) => {
                        info!("Webhook delivery from {ip}");
                        whitelist.contains(&ip)
                    },
                    (_, None) => true,
                    (None, Some(_)) => {
                        warn!("No IP address found in webhook remote peer request, denying access.");
                        false
                    },
                };
                if whitelisted {
                    srv.call(req).boxed_local()
                } else {
                    ok(req.error_response(ServerError::ForbiddenPeer)).boxed_local()
                }
            })
            .service(WebhookRoute::<SqliteDatabase>::new());
        app.service(health).service(api_scope).service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
