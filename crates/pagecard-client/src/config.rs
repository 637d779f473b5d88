use std::time::Duration;

use pagecard_core::AppError;

/// Browser user agents, one of which is picked per fetcher.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPad; CPU OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36 Edg/91.0.864.59",
];

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport settings for [`ReqwestFetcher`](crate::ReqwestFetcher).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    /// A random browser user agent and a 30 second timeout.
    fn default() -> Self {
        Self {
            user_agent: pick_user_agent().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FetchConfig {
    /// Read configuration from environment variables.
    ///
    /// - `PAGECARD_USER_AGENT` (optional, defaults to a random browser UA)
    /// - `PAGECARD_TIMEOUT_SECS` (optional, defaults to 30)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(ua) = lookup("PAGECARD_USER_AGENT").filter(|ua| !ua.trim().is_empty()) {
            config.user_agent = ua;
        }

        if let Some(raw) = lookup("PAGECARD_TIMEOUT_SECS") {
            let secs = parse_timeout_secs(&raw).map_err(|_| {
                AppError::ConfigError(format!(
                    "Invalid PAGECARD_TIMEOUT_SECS '{raw}': must be a positive integer"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parse a timeout in whole seconds. Zero is rejected.
pub fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::ConfigError(format!("'{raw}' is not a number of seconds")))?;
    if secs == 0 {
        return Err(AppError::ConfigError("timeout must be at least 1 second".into()));
    }
    Ok(secs)
}

/// Pick one of [`USER_AGENTS`].
pub fn pick_user_agent() -> &'static str {
    USER_AGENTS[rand_index(USER_AGENTS.len())]
}

fn rand_index(len: usize) -> usize {
    // Seed from high-resolution clock; good enough for UA rotation, not crypto.
    let mut x = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    // xorshift64
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    (x % len as u64) as usize
}
