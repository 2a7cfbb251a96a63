use super::WaitlistState;
use crate::error::{Result, WaitlistError};
use crate::store::NewEntrant;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, warn};

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub success: bool,
    pub message: String,
}

/// `POST /api/waitlist`
///
/// The body is read as raw bytes so that malformed JSON, a missing body, a
/// missing `Content-Type` or an oversize body all map to the same
/// `Invalid request` outcome.
pub async fn join_waitlist(
    State(state): State<Arc<WaitlistState>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse> {
    let body = body.map_err(|e| {
        debug!("Could not read waitlist submission body: {}", e);
        WaitlistError::InvalidRequest {
            message: format!("Failed to read request body: {}", e),
        }
    })?;

    let entry = parse_submission(&body).map_err(|e| {
        debug!("Rejected waitlist submission: {}", e);
        e
    })?;

    match state.store.register_entrant(entry).await {
        Ok(entrant) => {
            info!("Added entrant {} to waitlist", entrant.id);

            Ok((
                StatusCode::OK,
                Json(JoinResponse {
                    success: true,
                    message: "Joined waitlist successfully".to_string(),
                }),
            ))
        }
        Err(e @ WaitlistError::DuplicateEmail { .. }) => {
            warn!("Rejected duplicate waitlist signup");
            Err(e)
        }
        Err(e) => {
            error!("Database error: {}", e);
            Err(e)
        }
    }
}

/// Validate a raw submission body.
///
/// Email is checked before name. `interest` and `message` carry no content
/// rules: missing, null or empty values become `None`.
pub fn parse_submission(body: &[u8]) -> Result<NewEntrant> {
    let value: Value = serde_json::from_slice(body).map_err(|e| WaitlistError::InvalidRequest {
        message: format!("Malformed JSON body: {}", e),
    })?;

    let fields = value.as_object().ok_or_else(|| WaitlistError::InvalidRequest {
        message: "Request body must be a JSON object".to_string(),
    })?;

    let email = match fields.get("email") {
        Some(Value::String(email)) if is_valid_email(email) => email.clone(),
        _ => return Err(WaitlistError::InvalidEmail),
    };

    let name = match fields.get("name") {
        None | Some(Value::Null) => return Err(WaitlistError::NameRequired),
        Some(Value::String(name)) if name.trim().is_empty() => {
            return Err(WaitlistError::NameRequired)
        }
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(WaitlistError::InvalidRequest {
                message: format!("Field 'name' must be a string, got {}", other),
            })
        }
    };

    Ok(NewEntrant {
        email,
        name,
        interest: optional_text(fields, "interest")?,
        message: optional_text(fields, "message")?,
    })
}

fn optional_text(fields: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(scalar.to_string())),
        Some(_) => Err(WaitlistError::InvalidRequest {
            message: format!("Field '{}' must be a string", key),
        }),
    }
}

/// `local@domain.tld` shape: no whitespace, one `@`, a `.` after it.
fn is_valid_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
        .is_match(email)
}
