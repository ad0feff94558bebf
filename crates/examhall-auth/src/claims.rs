//! JWT claim structure for access tokens.

use examhall_core::permissions::{PermissionError, Role};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// `role` reflects the account at issue time and is informational only;
/// authorization always re-reads the account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Account ID (subject claim)
    pub sub: String,
    /// Account email address
    pub email: String,
    /// Role at the time the token was issued
    pub role: Role,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// The principal id carried by the token.
    pub fn user_id(&self) -> Result<Uuid, PermissionError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| PermissionError::Authentication("Invalid user ID in token".to_string()))
    }
}
