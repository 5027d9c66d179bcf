//! Contact form route handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use sharp_core::Email;

use crate::error::{AppError, Result};
use crate::services::notifications;
use crate::state::AppState;

/// Upper bound on message length, to keep the inbox usable.
const MAX_MESSAGE_LENGTH: usize = 5_000;

/// Contact form body.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Forward a contact message to the shop inbox.
///
/// Delivery is best-effort; a valid submission is accepted even when
/// the relay is down.
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactRequest>,
) -> Result<StatusCode> {
    let name = form.name.trim();
    let message = form.message.trim();

    if name.is_empty() || message.is_empty() {
        return Err(AppError::Validation(
            "name and message are required".to_string(),
        ));
    }
    if message.len() > MAX_MESSAGE_LENGTH {
        return Err(AppError::Validation("message is too long".to_string()));
    }

    // The reply address is optional; the message is forwarded either
    // way, and only a valid address earns an auto-reply.
    let email = Email::parse(&form.email).ok();
    let reply_to = email.as_ref().map_or("(not provided)", Email::as_str);

    notifications::contact_message(&state, name, reply_to, message).await;
    if let Some(email) = &email {
        notifications::contact_auto_reply(&state, name, email.as_str()).await;
    }

    Ok(StatusCode::ACCEPTED)
}
