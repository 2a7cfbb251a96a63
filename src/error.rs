use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaitlistError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Name is required")]
    NameRequired,

    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Storage unavailable: {cause}")]
    StorageUnavailable { cause: String },
}

/// Body returned for every failed request. Internal causes stay in the logs.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl WaitlistError {
    pub fn status(&self) -> StatusCode {
        match self {
            WaitlistError::InvalidRequest { .. }
            | WaitlistError::InvalidEmail
            | WaitlistError::NameRequired => StatusCode::BAD_REQUEST,
            WaitlistError::DuplicateEmail { .. } => StatusCode::CONFLICT,
            WaitlistError::StorageUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            WaitlistError::InvalidRequest { .. } => "Invalid request",
            WaitlistError::InvalidEmail => "Invalid email address",
            WaitlistError::NameRequired => "Name is required",
            WaitlistError::DuplicateEmail { .. } => "This email is already on the waitlist",
            WaitlistError::StorageUnavailable { .. } => "Database connection failed",
        }
    }
}

impl IntoResponse for WaitlistError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.public_message().to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<tokio_postgres::Error> for WaitlistError {
    fn from(err: tokio_postgres::Error) -> Self {
        WaitlistError::StorageUnavailable {
            cause: err.to_string(),
        }
    }
}

impl From<deadpool_postgres::PoolError> for WaitlistError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        WaitlistError::StorageUnavailable {
            cause: format!("Pool error: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, WaitlistError>;
