//! Authgate - session-based authentication gateway
//!
//! This is the library interface for the gateway, exposing the HTTP
//! server, configuration, and authentication building blocks for
//! programmatic use and testing.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use error::Error;
