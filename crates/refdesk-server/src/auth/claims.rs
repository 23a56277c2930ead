//! JWT claims structure for Refdesk sessions.

use serde::{Deserialize, Serialize};

/// Role string carried by administrator sessions.
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims embedded in session tokens.
///
/// Carries the identity the route layer consumes: user id, name fields,
/// email, and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID (unique per token).
    pub jti: String,
    /// Subject (user ID).
    pub sub: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email.
    pub email: String,
    /// Role: "user" or "admin".
    pub role: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}
