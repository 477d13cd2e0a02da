use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_TEMPLATE_DIR: &str = "tmpl";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Application configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub template_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }

    /// Read `TINYWIKI_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::new();
        let port = match lookup("TINYWIKI_PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    log::warn!("Ignoring invalid TINYWIKI_PORT '{}', using {}", raw, DEFAULT_PORT);
                    DEFAULT_PORT
                }
            },
            None => defaults.port,
        };

        Self {
            data_dir: lookup("TINYWIKI_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            template_dir: lookup("TINYWIKI_TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            host: lookup("TINYWIKI_HOST").unwrap_or(defaults.host),
            port,
        }
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self.host.parse::<IpAddr>().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid host '{}', binding {}", self.host, DEFAULT_HOST);
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        });
        SocketAddr::new(ip, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_classic_layout() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.template_dir, PathBuf::from("tmpl"));
        assert_eq!(config.socket_addr(), "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("TINYWIKI_DATA_DIR", "/srv/pages"),
            ("TINYWIKI_PORT", "9000"),
            ("TINYWIKI_HOST", "127.0.0.1"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/srv/pages"));
        assert_eq!(config.template_dir, PathBuf::from("tmpl"));
        assert_eq!(config.socket_addr(), "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn bad_port_falls_back() {
        let config = Config::from_lookup(|k| (k == "TINYWIKI_PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8080);
    }
}
