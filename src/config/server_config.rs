//! HTTP server configuration parsing from environment variables.

use super::EnvLookup;
use anyhow::{Context, Result};
use std::net::{SocketAddr, ToSocketAddrs};

/// Server environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerEnvConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self> {
        let defaults = Self::default();
        let port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid SERVER_PORT: {}", raw))?,
            None => defaults.port,
        };

        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or(defaults.host),
            port,
        })
    }

    /// Resolves `host:port`. Hostnames (`localhost`) and bare IPv6 literals (`::`) are accepted.
    pub fn socket_addrs(&self) -> Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("Invalid bind host {:?}", self.host))?
            .collect();
        if addrs.is_empty() {
            anyhow::bail!("Bind host {:?} resolved to no addresses", self.host);
        }
        Ok(addrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerEnvConfig::from_lookup(&|_| None).unwrap();
        assert_eq!(config, ServerEnvConfig::default());
        let addrs = config.socket_addrs().unwrap();
        assert_eq!(addrs[0].to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = ServerEnvConfig::from_lookup(&|key| {
            (key == "SERVER_PORT").then(|| "eighty".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_host_fails_at_bind_time() {
        let config = ServerEnvConfig {
            host: "not a host".to_string(),
            port: 8000,
        };
        assert!(config.socket_addrs().is_err());
    }

    #[test]
    fn test_hostname_and_ipv6_hosts_resolve() {
        let localhost = ServerEnvConfig {
            host: "localhost".to_string(),
            port: 8000,
        };
        let addrs = localhost.socket_addrs().unwrap();
        assert!(addrs.iter().all(|a| a.ip().is_loopback() && a.port() == 8000));

        let any_v6 = ServerEnvConfig {
            host: "::".to_string(),
            port: 9000,
        };
        assert_eq!(any_v6.socket_addrs().unwrap()[0].to_string(), "[::]:9000");
    }
}
