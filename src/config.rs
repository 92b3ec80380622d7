use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://appradiofm.com/api";
pub const DEFAULT_SHORTURL_BASE: &str = "https://appradiofm.com/radioplay";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;

/// Where the "Listen" link of a rendered entry comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPolicy {
    /// Use the upstream `deeplink` field as-is.
    Deeplink,
    /// Build `<base>/<st_shorturl>`, falling back to `deeplink` when no short code is present.
    ShortUrl { base: String },
}

impl LinkPolicy {
    pub fn resolve(&self, deeplink: &str, short_code: Option<&str>) -> String {
        match self {
            Self::Deeplink => deeplink.to_string(),
            Self::ShortUrl { base } => match short_code.map(str::trim).filter(|c| !c.is_empty()) {
                Some(code) => format!("{}/{}", base.trim_end_matches('/'), code),
                None => deeplink.to_string(),
            },
        }
    }
}

/// Which method names the dispatcher accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtocolSurface {
    pub legacy_method_names: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
    pub link_policy: LinkPolicy,
    pub protocol: ProtocolSurface,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("RADIO_API_BASE_URL must be an http(s) URL")]
    InvalidBaseUrl,
    #[error("UPSTREAM_TIMEOUT_SECS must be a positive integer")]
    InvalidTimeout,
    #[error("LINK_POLICY must be one of: deeplink, shorturl")]
    InvalidLinkPolicy,
    #[error("MCP_LEGACY_METHODS must be true or false")]
    InvalidFlag,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_port = parse_or(var("PORT"), DEFAULT_PORT, ConfigError::InvalidPort)?;

        let upstream_base_url = var("RADIO_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !(upstream_base_url.starts_with("http://") || upstream_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidBaseUrl);
        }

        let timeout_secs = parse_or(
            var("UPSTREAM_TIMEOUT_SECS"),
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
            ConfigError::InvalidTimeout,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let link_policy = match var("LINK_POLICY")
            .map(|value| value.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("deeplink") => LinkPolicy::Deeplink,
            Some("shorturl") => LinkPolicy::ShortUrl {
                base: var("SHORTURL_BASE").unwrap_or_else(|| DEFAULT_SHORTURL_BASE.to_string()),
            },
            Some(_) => return Err(ConfigError::InvalidLinkPolicy),
        };

        let legacy_method_names = parse_or(var("MCP_LEGACY_METHODS"), false, ConfigError::InvalidFlag)?;

        let config = Self {
            bind_addr,
            bind_port,
            upstream_base_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
            link_policy,
            protocol: ProtocolSurface {
                legacy_method_names,
            },
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T, err: ConfigError) -> Result<T, ConfigError> {
    value
        .map(|value| value.parse::<T>().map_err(|_| err))
        .transpose()
        .map(|parsed| parsed.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn parse_defaults() {
        let config = config_from(&[]).expect("config should parse");
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.bind_port, 3000);
        assert_eq!(config.upstream_base_url, DEFAULT_UPSTREAM_BASE_URL);
        assert_eq!(config.upstream_timeout, Duration::from_secs(15));
        assert_eq!(config.link_policy, LinkPolicy::Deeplink);
        assert!(!config.protocol.legacy_method_names);
    }

    #[test]
    fn port_is_read_from_environment() {
        let config = config_from(&[("PORT", "8081")]).expect("config should parse");
        assert_eq!(config.bind_port, 8081);
    }

    #[test]
    fn invalid_port_fails() {
        let err = config_from(&[("PORT", "70000")]).expect_err("expected invalid port");
        assert!(matches!(err, ConfigError::InvalidPort));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = config_from(&[("RADIO_API_BASE_URL", "http://localhost:9000/api/")])
            .expect("config should parse");
        assert_eq!(config.upstream_base_url, "http://localhost:9000/api");
    }

    #[test]
    fn base_url_without_scheme_fails() {
        let err = config_from(&[("RADIO_API_BASE_URL", "localhost:9000")])
            .expect_err("expected invalid base url");
        assert!(matches!(err, ConfigError::InvalidBaseUrl));
    }

    #[test]
    fn zero_timeout_fails() {
        let err = config_from(&[("UPSTREAM_TIMEOUT_SECS", "0")]).expect_err("expected invalid timeout");
        assert!(matches!(err, ConfigError::InvalidTimeout));
    }

    #[test]
    fn shorturl_policy_uses_default_base() {
        let config = config_from(&[("LINK_POLICY", "ShortUrl")]).expect("config should parse");
        assert_eq!(
            config.link_policy,
            LinkPolicy::ShortUrl {
                base: DEFAULT_SHORTURL_BASE.to_string()
            }
        );
    }

    #[test]
    fn unknown_link_policy_fails() {
        let err = config_from(&[("LINK_POLICY", "website")]).expect_err("expected invalid policy");
        assert!(matches!(err, ConfigError::InvalidLinkPolicy));
    }

    #[test]
    fn legacy_methods_flag_parses() {
        let config = config_from(&[("MCP_LEGACY_METHODS", "true")]).expect("config should parse");
        assert!(config.protocol.legacy_method_names);

        let err = config_from(&[("MCP_LEGACY_METHODS", "yes")]).expect_err("expected invalid flag");
        assert!(matches!(err, ConfigError::InvalidFlag));
    }

    #[test]
    fn shorturl_link_falls_back_to_deeplink() {
        let policy = LinkPolicy::ShortUrl {
            base: "https://example.test/play/".to_string(),
        };
        assert_eq!(
            policy.resolve("https://example.test/deep/1", Some("jazz-fm")),
            "https://example.test/play/jazz-fm"
        );
        assert_eq!(
            policy.resolve("https://example.test/deep/1", Some(" ")),
            "https://example.test/deep/1"
        );
        assert_eq!(
            LinkPolicy::Deeplink.resolve("https://example.test/deep/1", Some("jazz-fm")),
            "https://example.test/deep/1"
        );
    }
}
