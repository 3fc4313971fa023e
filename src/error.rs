//! Error types for the authentication gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Too many login attempts")]
    RateLimited,

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'authgate init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Error::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Please fill in all fields", "fields": fields }),
            ),
            Error::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Invalid credentials" }),
            ),
            Error::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": "Not authenticated" }),
            ),
            Error::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "message": "Too many login attempts, please try again later" }),
            ),
            // Infrastructure failures: log the detail, return a generic body.
            _ => {
                tracing::error!("request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
