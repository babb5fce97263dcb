//! User handle: an opaque id plus what other users get to see.

use serde::{Deserialize, Serialize};

use campus_core::AppError;
use campus_core::result::AppResult;
use campus_core::types::UserId;

use super::role::UserRole;

/// Display attributes attached to presence records, roster entries and
/// chat messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayAttrs {
    /// Name shown next to the avatar.
    pub display_name: String,
    /// Avatar image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Student or faculty.
    #[serde(default)]
    pub role: UserRole,
}

/// Identity of one authenticated user, immutable for a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHandle {
    /// Opaque user id.
    pub user_id: UserId,
    /// Public attributes.
    pub display: DisplayAttrs,
}

impl UserHandle {
    /// Builds a handle from identity-provider fields.
    ///
    /// A blank display name falls back to the user id; a blank avatar
    /// reference is dropped.
    pub fn new(
        user_id: impl Into<UserId>,
        display_name: impl Into<String>,
        avatar_url: Option<String>,
        role: UserRole,
    ) -> AppResult<Self> {
        let user_id = user_id.into();
        if user_id.is_blank() {
            return Err(AppError::validation("user id must not be empty"));
        }

        let display_name = display_name.into().trim().to_string();
        let display_name = if display_name.is_empty() {
            user_id.to_string()
        } else {
            display_name
        };

        Ok(Self {
            display: DisplayAttrs {
                display_name,
                avatar_url: avatar_url.filter(|a| !a.trim().is_empty()),
                role,
            },
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_falls_back_to_id() {
        let handle = UserHandle::new("ada", "   ", Some(String::new()), UserRole::Faculty)
            .expect("valid handle");
        assert_eq!(handle.display.display_name, "ada");
        assert_eq!(handle.display.avatar_url, None);
    }

    #[test]
    fn test_blank_id_rejected() {
        let err = UserHandle::new("", "Nobody", None, UserRole::Student).unwrap_err();
        assert_eq!(err.kind, campus_core::error::ErrorKind::Validation);
    }
}
