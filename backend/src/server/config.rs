//! HTTP server configuration object and helpers.
//!
//! Configuration comes from the environment:
//!
//! - `BIND_ADDR`: socket address to listen on (default `0.0.0.0:8080`)
//! - `DATABASE_URL`: PostgreSQL connection string; when unset the server
//!   runs on in-memory fixtures (dev mode)
//! - `SESSION_KEY_FILE`: path to the session signing key material
//! - `SESSION_ALLOW_EPHEMERAL`: set to `1` to permit a generated key when
//!   the key file is missing (always permitted in debug builds)
//! - `SESSION_COOKIE_SECURE`: set to `0` to drop the `Secure` cookie flag
//!   for plain-HTTP development
//! - `VIN_DECODER_URL`: base URL of the decode endpoint

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use url::Url;

use crate::outbound::decoder::DEFAULT_DECODER_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Runtime configuration for the HTTP server.
pub struct ServerConfig {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub decoder_url: Url,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when an address or URL fails to parse, or when the
    /// session key file is unreadable and ephemeral keys are not allowed.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

        let decoder_url: Url = env::var("VIN_DECODER_URL")
            .unwrap_or_else(|_| DEFAULT_DECODER_URL.into())
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid VIN_DECODER_URL: {e}")))?;

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        Ok(Self {
            key: load_session_key()?,
            cookie_secure,
            same_site: SameSite::Lax,
            bind_addr,
            database_url: env::var("DATABASE_URL").ok(),
            decoder_url,
        })
    }
}

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| DEFAULT_SESSION_KEY_FILE.into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}
