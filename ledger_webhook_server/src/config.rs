use std::{env, net::IpAddr};

use chrono::Duration;
use log::*;
use lwg_common::{parse_boolean_flag, Secret};
use oauth_tools::OAuthConfig;

const DEFAULT_LWG_HOST: &str = "127.0.0.1";
const DEFAULT_LWG_PORT: u16 = 8460;
const DEFAULT_HMAC_HEADER: &str = "x-webhook-signature";
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::seconds(900);
const DEFAULT_REFRESH_MARGIN: Duration = Duration::minutes(30);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    /// How often the background worker scans the store for credentials in need of a refresh.
    pub refresh_interval: Duration,
    /// Credentials whose access token expires within this margin are refreshed pre-emptively.
    pub refresh_margin: Duration,
    /// Inbound webhook verification configuration.
    pub webhook_config: WebhookConfig,
    /// Outbound token service configuration.
    pub oauth_config: OAuthConfig,
}

#[derive(Clone, Debug)]
pub struct WebhookConfig {
    /// The shared secret the platform uses to sign webhook deliveries.
    pub hmac_secret: Secret<String>,
    /// Name of the header carrying the base64 HMAC-SHA256 digest of the raw request body.
    pub hmac_header: String,
    pub hmac_checks: bool,
    /// If supplied, requests against the /webhook endpoint will be checked against a whitelist of platform IP
    /// addresses. To explicitly disable the whitelist, set this to "false", "none", or "0".
    pub whitelist: Option<Vec<IpAddr>>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            hmac_secret: Secret::default(),
            hmac_header: DEFAULT_HMAC_HEADER.to_string(),
            hmac_checks: true,
            whitelist: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LWG_HOST.to_string(),
            port: DEFAULT_LWG_PORT,
            database_url: String::default(),
            use_x_forwarded_for: false,
            use_forwarded: false,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            refresh_margin: DEFAULT_REFRESH_MARGIN,
            webhook_config: WebhookConfig::default(),
            oauth_config: OAuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LWG_HOST").ok().unwrap_or_else(|| DEFAULT_LWG_HOST.into());
        let port = env::var("LWG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for LWG_PORT. {e} Using the default, {DEFAULT_LWG_PORT}, instead."
                    );
                    DEFAULT_LWG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_LWG_PORT);
        let database_url = env::var("LWG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ LWG_DATABASE_URL is not set. Please set it to the URL for the gateway database.");
            String::default()
        });
        let use_x_forwarded_for = parse_boolean_flag(env::var("LWG_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("LWG_USE_FORWARDED").ok(), false);
        let (refresh_interval, refresh_margin) = configure_refresh_timing();
        let webhook_config = WebhookConfig::from_env_or_defaults();
        let oauth_config = OAuthConfig::new_from_env_or_default();
        Self {
            host,
            port,
            database_url,
            use_x_forwarded_for,
            use_forwarded,
            refresh_interval,
            refresh_margin,
            webhook_config,
            oauth_config,
        }
    }
}

impl WebhookConfig {
    pub fn from_env_or_defaults() -> Self {
        let hmac_secret = env::var("LWG_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ LWG_WEBHOOK_SECRET is not set. Please set it to the verifier token from the platform's \
                 developer portal."
            );
            String::default()
        });
        let hmac_secret = Secret::new(hmac_secret);
        let hmac_header = env::var("LWG_WEBHOOK_HMAC_HEADER").ok().unwrap_or_else(|| DEFAULT_HMAC_HEADER.into());
        let hmac_checks = parse_boolean_flag(env::var("LWG_WEBHOOK_HMAC_CHECKS").ok(), true);
        if !hmac_checks {
            warn!(
                "🚨️ Webhook signature checks are disabled. Anyone can submit payloads to this gateway. Never run \
                 like this in production."
            );
        }
        let whitelist = env::var("LWG_WEBHOOK_IP_WHITELIST").ok().and_then(|s| {
            if ["none", "false", "0"].contains(&s.to_lowercase().as_str()) {
                info!(
                    "🪛️ Webhook IP whitelist is disabled. If this is not what you want, set \
                     LWG_WEBHOOK_IP_WHITELIST to a comma-separated list of IP addresses to enable it."
                );
                return None;
            }
            let ip_addrs = s
                .split(',')
                .filter_map(|s| {
                    s.parse()
                        .map_err(|e| {
                            warn!("🪛️ Ignoring invalid IP address ({s}) in LWG_WEBHOOK_IP_WHITELIST: {e}");
                            None::<IpAddr>
                        })
                        .ok()
                })
                .collect::<Vec<IpAddr>>();
            Some(ip_addrs)
        });
        match &whitelist {
            Some(whitelist) if whitelist.is_empty() => {
                warn!(
                    "🚨️ The webhook IP whitelist was configured, but is empty. The server will run, but won't \
                     authorise any incoming webhook requests."
                );
            },
            None => {
                info!("🪛️ No webhook IP whitelist is set. Only HMAC validation will be used.");
            },
            Some(v) => {
                let addrs = v.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
                info!("🪛️ Webhook IP whitelist: {addrs}");
            },
        }
        Self { hmac_secret, hmac_header, hmac_checks, whitelist }
    }
}

fn configure_refresh_timing() -> (Duration, Duration) {
    let refresh_interval = env::var("LWG_REFRESH_INTERVAL")
        .map_err(|_| {
            info!(
                "🪛️ LWG_REFRESH_INTERVAL is not set. Using the default value of {} s.",
                DEFAULT_REFRESH_INTERVAL.num_seconds()
            )
        })
        .and_then(|s| {
            s.parse::<i64>()
                .map(Duration::seconds)
                .map_err(|e| warn!("🪛️ Invalid configuration value for LWG_REFRESH_INTERVAL. {e}"))
        })
        .ok()
        .unwrap_or(DEFAULT_REFRESH_INTERVAL);
    let refresh_margin = env::var("LWG_REFRESH_MARGIN")
        .map_err(|_| {
            info!(
                "🪛️ LWG_REFRESH_MARGIN is not set. Using the default value of {} min.",
                DEFAULT_REFRESH_MARGIN.num_minutes()
            )
        })
        .and_then(|s| {
            s.parse::<i64>()
                .map(Duration::minutes)
                .map_err(|e| warn!("🪛️ Invalid configuration value for LWG_REFRESH_MARGIN. {e}"))
        })
        .ok()
        .unwrap_or(DEFAULT_REFRESH_MARGIN);
    (refresh_interval, refresh_margin)
}
