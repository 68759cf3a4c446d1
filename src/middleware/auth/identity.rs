//! Trusted identity headers forwarded to backend services.
//!
//! The values are always *set* on the outbound request, replacing anything the
//! client sent under the same names. Lists are comma-joined without escaping, so
//! a permission or role containing `,` cannot be told apart downstream.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header::InvalidHeaderValue};

use crate::services::auth::Claims;

pub const X_USER_EMAIL: HeaderName = HeaderName::from_static("x-user-email");
pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");
pub const X_USER_PERMISSIONS: HeaderName = HeaderName::from_static("x-user-permissions");
pub const X_USER_ROLES: HeaderName = HeaderName::from_static("x-user-roles");

/// All four header values, built up front so a request is either fully
/// rewritten or not forwarded at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeaders {
    email: HeaderValue,
    user_id: HeaderValue,
    permissions: HeaderValue,
    roles: HeaderValue,
}

impl IdentityHeaders {
    /// Absent claims become empty strings. Fails if a claim holds bytes that
    /// are not allowed in a header value (control characters).
    pub fn from_claims(claims: &Claims) -> Result<Self, InvalidHeaderValue> {
        let user_id = claims.user_id().map(|id| id.to_string()).unwrap_or_default();

        Ok(Self {
            email: header_value(claims.subject().unwrap_or_default())?,
            user_id: header_value(&user_id)?,
            permissions: header_value(&claims.permissions().join(","))?,
            roles: header_value(&claims.roles().join(","))?,
        })
    }

    #[cfg(test)]
    pub(crate) fn email(&self) -> &HeaderValue {
        &self.email
    }

    /// Overwrites every existing value of the four names.
    pub fn apply(self, headers: &mut HeaderMap) {
        headers.insert(X_USER_EMAIL, self.email);
        headers.insert(X_USER_ID, self.user_id);
        headers.insert(X_USER_PERMISSIONS, self.permissions);
        headers.insert(X_USER_ROLES, self.roles);
    }
}

fn header_value(s: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_bytes(s.as_bytes())
}
