use crate::{ConfigError, FromEnv, env_parse_or};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port the catalog has always listened on
pub const DEFAULT_PORT: u16 = 3000;

/// Listen address of the HTTP server
///
/// `HOST` must be an IP literal (default `0.0.0.0`); `PORT` defaults to 3000.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: env_parse_or("HOST", defaults.host)?,
            port: env_parse_or("PORT", defaults.port)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}
