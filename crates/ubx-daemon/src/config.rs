//! Daemon settings, read from the environment at boot.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use ubx_db::env_or;

pub const ENV_DAEMON_ADDR: &str = "UBX_DAEMON_ADDR";
/// Bare port; binds all interfaces. Ignored when UBX_DAEMON_ADDR is set.
pub const ENV_PORT: &str = "PORT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "UBX_REQUEST_TIMEOUT_SECS";
/// Comma-separated allowed origins; `*` (or unset) allows any origin.
pub const ENV_CORS_ORIGINS: &str = "UBX_CORS_ORIGINS";

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    pub fn parse(raw: &str) -> Self {
        let list: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if list.is_empty() || list.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(list)
        }
    }
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub addr: SocketAddr,
    /// Applied uniformly to every request.
    pub request_timeout: Duration,
    pub cors_origins: CorsOrigins,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        let addr = match std::env::var(ENV_DAEMON_ADDR) {
            Ok(v) => v
                .parse()
                .with_context(|| format!("invalid value for {ENV_DAEMON_ADDR}: {v:?}"))?,
            Err(_) => {
                let port: u16 = env_or(ENV_PORT, DEFAULT_PORT)?;
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        Ok(Self {
            addr,
            request_timeout: Duration::from_secs(env_or(ENV_REQUEST_TIMEOUT_SECS, 10)?),
            cors_origins: CorsOrigins::parse(&std::env::var(ENV_CORS_ORIGINS).unwrap_or_default()),
        })
    }
}
