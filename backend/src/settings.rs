//! Process configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags and `PORTAL_*` environment variables. Session
//! cookie settings are read separately by
//! [`crate::inbound::http::session_config`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 5006;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while turning settings into runtime values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_host` is not an IP address.
    #[error("invalid bind host {value:?}: {source}")]
    BindHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// `pool_max_size` is zero.
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
}

/// Server, database, and seeding settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// PostgreSQL connection URL. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Interface to listen on.
    pub bind_host: Option<String>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Insert the sample catalogue when the store holds no courses.
    #[ortho_config(default = true)]
    pub seed_sample_courses: bool,
}

impl PortalSettings {
    /// The socket address to bind, falling back to `0.0.0.0:5006`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = match self.bind_host.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_BIND_HOST,
            Some(raw) => raw.parse().map_err(|source| SettingsError::BindHost {
                value: raw.to_owned(),
                source,
            })?,
        };
        Ok(SocketAddr::new(host, self.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Connection pool ceiling, falling back to 10.
    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        match self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }

    /// The database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
