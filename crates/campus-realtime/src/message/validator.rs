//! Message validation rules.

use campus_core::error::AppError;
use campus_core::result::AppResult;

/// Maximum allowed inbound frame size in bytes.
const MAX_FRAME_SIZE: usize = 65_536;

/// Validates a raw inbound frame before parsing.
pub fn validate_frame(raw: &str) -> AppResult<()> {
    if raw.len() > MAX_FRAME_SIZE {
        return Err(AppError::validation(format!(
            "Frame exceeds maximum size of {MAX_FRAME_SIZE} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty frame"));
    }

    Ok(())
}

/// Trims a chat body and enforces the length limit (in characters).
pub fn validate_chat_body(body: &str, max_len: usize) -> AppResult<String> {
    let body = body.trim();
    if body.is_empty() {
        return Err(AppError::validation("Message body must not be empty"));
    }

    let len = body.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "Message body is {len} characters, maximum is {max_len}"
        )));
    }

    Ok(body.to_string())
}

/// Normalizes a status line: blank becomes `None`, long lines are rejected.
pub fn normalize_status_message(message: Option<String>, max_len: usize) -> AppResult<Option<String>> {
    let Some(message) = message else {
        return Ok(None);
    };

    let message = message.trim();
    if message.is_empty() {
        return Ok(None);
    }

    if message.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "Status message exceeds {max_len} characters"
        )));
    }

    Ok(Some(message.to_string()))
}
