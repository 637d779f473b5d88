use pagecard_core::AppError;

/// Listener and fetch-policy settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Let the fetcher reach private/reserved IPs.
    pub allow_private_urls: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allow_private_urls: false,
        }
    }
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `PAGECARD_HOST` (optional, defaults to `0.0.0.0`)
    /// - `PAGECARD_PORT` (optional, defaults to 8000)
    /// - `PAGECARD_ALLOW_PRIVATE_URLS` (optional, defaults to false)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(host) = lookup("PAGECARD_HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }

        if let Some(raw) = lookup("PAGECARD_PORT") {
            config.port = match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => {
                    return Err(AppError::ConfigError(format!(
                        "Invalid PAGECARD_PORT '{raw}': must be between 1 and 65535"
                    )));
                }
            };
        }

        if let Some(raw) = lookup("PAGECARD_ALLOW_PRIVATE_URLS") {
            config.allow_private_urls = parse_bool(&raw).ok_or_else(|| {
                AppError::ConfigError(format!(
                    "Invalid PAGECARD_ALLOW_PRIVATE_URLS '{raw}': expected true or false"
                ))
            })?;
        }

        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, AppError> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PAGECARD_HOST", "127.0.0.1"),
            ("PAGECARD_PORT", "9000"),
            ("PAGECARD_ALLOW_PRIVATE_URLS", "TRUE"),
        ])
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:9000");
        assert!(config.allow_private_urls);
    }

    #[test]
    fn test_invalid_port() {
        for raw in ["0", "70000", "http"] {
            let err = config(&[("PAGECARD_PORT", raw)]).unwrap_err();
            assert!(matches!(err, AppError::ConfigError(_)), "raw {raw:?}");
        }
    }

    #[test]
    fn test_invalid_bool() {
        let err = config(&[("PAGECARD_ALLOW_PRIVATE_URLS", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("PAGECARD_ALLOW_PRIVATE_URLS"));
    }
}
