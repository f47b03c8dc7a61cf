use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::time::Duration;
use url::Url;

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://sandbox.wompi.co/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_format: LogFormat,
    pub gateway: GatewayConfig,
}

/// Endpoints and credentials of the payment gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub public_key: String,
    /// Used only for server-to-server status queries.
    pub private_key: String,
    pub integrity_key: String,
    pub timeout: Duration,
    /// Extra attempts for idempotent GET calls that got no response.
    pub max_retries: u32,
    pub retry_backoff: Duration,
    /// Upper bound for a single backoff sleep.
    pub max_retry_delay: Duration,
    /// Forced outcome for sandbox submissions. Never set in production.
    pub sandbox_status: Option<String>,
}

impl GatewayConfig {
    pub fn new(
        base_url: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
        integrity_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            public_key: public_key.into(),
            private_key: private_key.into(),
            integrity_key: integrity_key.into(),
            timeout: Duration::from_secs(30),
            max_retries: 0,
            retry_backoff: Duration::from_millis(200),
            max_retry_delay: Duration::from_secs(5),
            sandbox_status: None,
        }
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn acceptance_token_url(&self) -> String {
        format!("{}/merchants/{}", self.base(), self.public_key)
    }

    pub fn tokenize_card_url(&self) -> String {
        format!("{}/tokens/cards", self.base())
    }

    pub fn transactions_url(&self) -> String {
        format!("{}/transactions", self.base())
    }

    /// Status endpoint of one gateway transaction. The id always lands as a
    /// single escaped path segment; `None` for ids that could only name a
    /// different resource, or a base URL without a path.
    pub fn transaction_url(&self, id: &str) -> Option<Url> {
        if id.is_empty() || id == "." || id == ".." {
            return None;
        }
        let mut url = Url::parse(self.base()).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push("transactions")
            .push(id);
        Some(url)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.base_url).context("GATEWAY_BASE_URL is not a valid URL")?;
        if self.public_key.is_empty() {
            anyhow::bail!("GATEWAY_PUBLIC_KEY is empty");
        }
        if self.private_key.is_empty() {
            anyhow::bail!("GATEWAY_PRIVATE_KEY is empty");
        }
        if self.integrity_key.is_empty() {
            anyhow::bail!("GATEWAY_INTEGRITY_KEY is empty");
        }
        Ok(())
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("public_key", &self.public_key)
            .field("private_key", &mask_secret(&self.private_key))
            .field("integrity_key", &mask_secret(&self.integrity_key))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("max_retry_delay", &self.max_retry_delay)
            .field("sandbox_status", &self.sandbox_status)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{} is required", key));

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", other),
        };

        let gateway = GatewayConfig {
            base_url: lookup("GATEWAY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_BASE_URL.to_string()),
            public_key: required("GATEWAY_PUBLIC_KEY")?,
            private_key: required("GATEWAY_PRIVATE_KEY")?,
            integrity_key: required("GATEWAY_INTEGRITY_KEY")?,
            timeout: Duration::from_secs(
                lookup("GATEWAY_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()
                    .context("GATEWAY_TIMEOUT_SECS must be an integer")?,
            ),
            max_retries: lookup("GATEWAY_MAX_RETRIES")
                .unwrap_or_else(|| "0".to_string())
                .parse()
                .context("GATEWAY_MAX_RETRIES must be an integer")?,
            retry_backoff: Duration::from_millis(
                lookup("GATEWAY_RETRY_BACKOFF_MS")
                    .unwrap_or_else(|| "200".to_string())
                    .parse()
                    .context("GATEWAY_RETRY_BACKOFF_MS must be an integer")?,
            ),
            max_retry_delay: Duration::from_millis(
                lookup("GATEWAY_MAX_RETRY_DELAY_MS")
                    .unwrap_or_else(|| "5000".to_string())
                    .parse()
                    .context("GATEWAY_MAX_RETRY_DELAY_MS must be an integer")?,
            ),
            sandbox_status: lookup("GATEWAY_SANDBOX_STATUS").filter(|s| !s.is_empty()),
        };

        Ok(Config {
            server_port: lookup("SERVER_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a port number")?,
            database_url: required("DATABASE_URL")?,
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be an integer")?,
            log_format,
            gateway,
        })
    }
}

pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

/// Hides the password component of a connection URL.
pub fn mask_password(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            let _ = parsed.set_password(Some("****"));
            parsed.to_string()
        }
        _ => url.to_string(),
    }
}
