//! Studio server configuration — loaded from environment variables.

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the hosted auth service (e.g. `https://xyz.supabase.co`).
    pub auth_url: String,
    /// Public API key sent as `apikey` to the auth service.
    pub auth_api_key: String,
    /// Base URL of the payment gateway REST API.
    pub gateway_url: String,
    /// Secret key used for basic auth against the payment gateway.
    pub gateway_secret_key: String,
    /// Shared secret for webhook HMAC validation. Empty disables the check.
    pub webhook_secret: String,
    /// Public site origin, used for CORS.
    pub public_site_url: String,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
    /// Session cookie lifetime when the auth service does not report one.
    pub session_max_age_secs: i64,
    /// Maximum pooled database connections.
    pub db_max_connections: usize,
    /// Per-request timeout for outbound HTTP and inbound handlers.
    pub request_timeout_secs: u64,
    /// Port of the Prometheus exporter.
    pub metrics_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let parsed = |key: &str| lookup(key).and_then(|s| s.parse::<i64>().ok());

        let auth_url = string("STAGECUT_AUTH_URL", "http://localhost:54321")
            .trim_end_matches('/')
            .to_string();
        let auth_api_key = string("STAGECUT_AUTH_API_KEY", "");
        let gateway_url = string("STAGECUT_GATEWAY_URL", "https://api.tosspayments.com")
            .trim_end_matches('/')
            .to_string();
        let gateway_secret_key = string("STAGECUT_GATEWAY_SECRET_KEY", "");
        let webhook_secret = string("STAGECUT_WEBHOOK_SECRET", "");
        let public_site_url = string("STAGECUT_PUBLIC_SITE_URL", "http://localhost:3000");
        let cookie_secure = lookup("STAGECUT_COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let session_max_age_secs = parsed("STAGECUT_SESSION_MAX_AGE").unwrap_or(60 * 60 * 24 * 7);
        let db_max_connections = parsed("STAGECUT_DB_MAX_CONNECTIONS")
            .map(|n| n.max(1) as usize)
            .unwrap_or(10);
        let request_timeout_secs = parsed("STAGECUT_REQUEST_TIMEOUT")
            .map(|n| n.max(1) as u64)
            .unwrap_or(15);
        let metrics_port = lookup("STAGECUT_METRICS_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(9100);

        if auth_api_key.is_empty() {
            tracing::warn!("STAGECUT_AUTH_API_KEY not set -- auth service calls may be rejected");
        }
        if gateway_secret_key.is_empty() {
            tracing::warn!("STAGECUT_GATEWAY_SECRET_KEY not set -- payment verification will fail");
        }
        if webhook_secret.is_empty() {
            tracing::warn!("STAGECUT_WEBHOOK_SECRET not set -- webhook signature validation disabled");
        }

        Self {
            auth_url,
            auth_api_key,
            gateway_url,
            gateway_secret_key,
            webhook_secret,
            public_site_url,
            cookie_secure,
            session_max_age_secs,
            db_max_connections,
            request_timeout_secs,
            metrics_port,
        }
    }
}
