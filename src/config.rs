//! Runtime configuration, read from the environment (and `.env` via dotenvy).

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::zone::ClientZone;

/// Header the tunnelling proxy in front of the API expects on every request.
pub const DEFAULT_TUNNEL_HEADER: (&str, &str) = ("ngrok-skip-browser-warning", "true");

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the BarberBook API, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,
    pub bind_addr: String,
    /// Origin used to build shareable public booking links.
    pub public_base_url: String,
    /// Where the client's key-value storage lives.
    pub storage_path: PathBuf,
    pub zone: ClientZone,
    /// Fixed header sent on every API request; `None` disables it.
    pub tunnel_header: Option<(String, String)>,
    pub api_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            storage_path: PathBuf::from("./data/client-storage.json"),
            zone: ClientZone::Local,
            tunnel_header: Some((DEFAULT_TUNNEL_HEADER.0.to_string(), DEFAULT_TUNNEL_HEADER.1.to_string())),
            api_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or invalid values keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let zone = match get("CLIENT_UTC_OFFSET_MINUTES") {
            Some(raw) => match raw.parse::<i32>().ok().and_then(ClientZone::from_offset_minutes) {
                Some(zone) => zone,
                None => {
                    warn!("Ignoring invalid CLIENT_UTC_OFFSET_MINUTES={raw}; using the host timezone");
                    ClientZone::Local
                }
            },
            None => defaults.zone,
        };

        let tunnel_header = match (get("TUNNEL_HEADER_NAME"), get("TUNNEL_HEADER_VALUE")) {
            (Some(name), _) if name.eq_ignore_ascii_case("none") => None,
            (Some(name), value) => Some((name, value.unwrap_or_else(|| DEFAULT_TUNNEL_HEADER.1.to_string()))),
            (None, Some(value)) => Some((DEFAULT_TUNNEL_HEADER.0.to_string(), value)),
            (None, None) => defaults.tunnel_header,
        };

        let api_timeout = get("API_TIMEOUT_SECS")
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            api_base_url: get("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            public_base_url: get("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),
            storage_path: get("CLIENT_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            zone,
            tunnel_header,
            api_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = config(&[]);

        assert_eq!(cfg.api_base_url, "http://localhost:5000/api");
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000");
        assert_eq!(cfg.zone, ClientZone::Local);
        assert_eq!(
            cfg.tunnel_header,
            Some(("ngrok-skip-browser-warning".to_string(), "true".to_string()))
        );
        assert!(cfg.api_timeout.is_none());
    }

    #[test]
    fn values_are_trimmed_and_parsed() {
        let cfg = config(&[
            ("API_BASE_URL", " https://api.example.com/api/ "),
            ("CLIENT_UTC_OFFSET_MINUTES", "240"),
            ("API_TIMEOUT_SECS", "15"),
            ("PUBLIC_BASE_URL", "https://book.example.com/"),
        ]);

        assert_eq!(cfg.api_base_url, "https://api.example.com/api");
        assert_eq!(cfg.public_base_url, "https://book.example.com");
        assert_eq!(cfg.zone, ClientZone::from_offset_minutes(240).unwrap());
        assert_eq!(cfg.api_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn invalid_offset_falls_back_to_host_zone() {
        assert_eq!(config(&[("CLIENT_UTC_OFFSET_MINUTES", "abc")]).zone, ClientZone::Local);
        assert_eq!(config(&[("CLIENT_UTC_OFFSET_MINUTES", "100000")]).zone, ClientZone::Local);
    }

    #[test]
    fn tunnel_header_can_be_renamed_or_disabled() {
        let renamed = config(&[("TUNNEL_HEADER_NAME", "x-proxy"), ("TUNNEL_HEADER_VALUE", "1")]);
        assert_eq!(renamed.tunnel_header, Some(("x-proxy".to_string(), "1".to_string())));

        assert_eq!(config(&[("TUNNEL_HEADER_NAME", "none")]).tunnel_header, None);
    }
}
