//! Server configuration and bootstrap helpers.

pub mod config;

pub use config::ServerConfig;
