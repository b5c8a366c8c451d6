//! Server configuration.
//!
//! Read once from the environment at start-up (after `.env` is loaded)
//! and passed explicitly from then on.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_DATABASE_PATH: &str = "./data/structree.db";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Runtime configuration for `structree-server`.
#[derive(Clone)]
pub struct ServerConfig {
    /// libsql database file (`STRUCTREE_DATABASE_PATH`)
    pub database_path: PathBuf,
    /// Interface to listen on (`STRUCTREE_BIND_ADDR`)
    pub bind_addr: IpAddr,
    /// Port to listen on (`STRUCTREE_PORT`)
    pub port: u16,
    /// HS256 secret for bearer tokens (`STRUCTREE_JWT_SECRET`)
    pub jwt_secret: String,
    /// Single allowed CORS origin (`CORS_ALLOW_ORIGIN`)
    pub cors_allow_origin: Option<HeaderValue>,
}

impl ServerConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_path = lookup("STRUCTREE_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let bind_addr = match lookup("STRUCTREE_BIND_ADDR") {
            Some(addr) => addr
                .parse::<IpAddr>()
                .with_context(|| format!("Invalid STRUCTREE_BIND_ADDR: {}", addr))?,
            None => DEFAULT_BIND_ADDR,
        };

        let port = match lookup("STRUCTREE_PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid STRUCTREE_PORT: {}", port))?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = lookup("STRUCTREE_JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .context("STRUCTREE_JWT_SECRET environment variable not set")?;

        let cors_allow_origin = lookup("CORS_ALLOW_ORIGIN")
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS_ALLOW_ORIGIN: {}", origin))
            })
            .transpose()?;

        Ok(Self {
            database_path,
            bind_addr,
            port,
            jwt_secret,
            cors_allow_origin,
        })
    }

    /// Address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("database_path", &self.database_path)
            .field("bind_addr", &self.bind_addr)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("cors_allow_origin", &self.cors_allow_origin)
            .finish()
    }
}
