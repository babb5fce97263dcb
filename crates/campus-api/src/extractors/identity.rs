//! `ClientIdentity` extractor: builds a [`UserHandle`] from the upgrade query.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use campus_core::error::AppError;
use campus_entity::user::{UserHandle, UserRole};

use crate::dto::request::IdentityQuery;
use crate::error::ApiError;

/// The identity a WebSocket client connects as.
#[derive(Debug, Clone)]
pub struct ClientIdentity(pub UserHandle);

impl ClientIdentity {
    /// Validates the raw query fields.
    pub fn from_query(query: IdentityQuery) -> Result<Self, AppError> {
        let role = match query.role.as_deref().map(str::trim) {
            None | Some("") => UserRole::default(),
            Some(raw) => raw.parse()?,
        };
        let handle = UserHandle::new(
            query.user_id.as_str(),
            query.display_name.unwrap_or_default(),
            query.avatar_url,
            role,
        )?;
        Ok(Self(handle))
    }

    /// Unwraps the handle.
    pub fn into_inner(self) -> UserHandle {
        self.0
    }
}

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<IdentityQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid identity: {e}")))?;
        Ok(Self::from_query(query)?)
    }
}
