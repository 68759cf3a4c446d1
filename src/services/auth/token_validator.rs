use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::JwtSettings;

/// The only failure callers ever see. Which check failed is logged, not returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid or expired token")]
pub struct InvalidToken;

// Reason a token was refused. Stays inside this module.
#[derive(Debug, Error)]
enum Rejected {
    #[error("malformed token: {0}")]
    Malformed(jsonwebtoken::errors::Error),
    #[error("signature verification failed")]
    Signature,
    #[error("algorithm not allowed")]
    Algorithm,
    #[error("token expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },
    #[error("token not valid before {nbf} (now {now})")]
    NotYetValid { nbf: i64, now: i64 },
    #[error("timestamp out of range: {0}")]
    Timestamp(i64),
}

impl From<jsonwebtoken::errors::Error> for Rejected {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::Signature,
            ErrorKind::InvalidAlgorithm => Self::Algorithm,
            _ => Self::Malformed(e),
        }
    }
}

/// Payload as it appears on the wire. Wrong JSON types fail the whole token.
#[derive(Debug, Clone, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default, rename = "userId")]
    user_id: Option<i64>,
    #[serde(default)]
    permissions: Option<Vec<String>>,
    #[serde(default)]
    roles: Option<Vec<String>>,
    exp: i64,
    #[serde(default)]
    nbf: Option<i64>,
    #[serde(default)]
    iat: Option<i64>,
}

/// Identity attributes of a token that passed signature and expiry checks.
///
/// There is no public constructor: a `Claims` value can only come out of
/// [`TokenValidator::validate`], and a fresh one is produced on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    subject: Option<String>,
    user_id: Option<i64>,
    permissions: Option<Vec<String>>,
    roles: Option<Vec<String>>,
    expires_at: DateTime<Utc>,
    issued_at: Option<DateTime<Utc>>,
}

impl Claims {
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// Empty when the token carries no `permissions` claim.
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or_default()
    }

    /// Empty when the token carries no `roles` claim.
    pub fn roles(&self) -> &[String] {
        self.roles.as_deref().unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }
}

/// HMAC variants and the shortest key (in bytes) each one accepts: the digest size.
const HMAC_KEY_FLOORS: [(Algorithm, usize); 3] = [
    (Algorithm::HS256, 32),
    (Algorithm::HS384, 48),
    (Algorithm::HS512, 64),
];

fn hmac_algorithms(key_len: usize) -> Vec<Algorithm> {
    HMAC_KEY_FLOORS
        .iter()
        .filter(|(_, min)| key_len >= *min)
        .map(|(alg, _)| *alg)
        .collect()
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, Rejected> {
    DateTime::from_timestamp(secs, 0).ok_or(Rejected::Timestamp(secs))
}

/// HMAC-SHA (HS256/HS384/HS512) bearer-token verifier.
///
/// - A variant is only accepted when the secret is at least its digest size, so
///   a 32-byte secret verifies HS256 tokens only.
/// - Key material is intentionally not printable via Debug.
/// - Holds no mutable state; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenValidator {
    pub fn new(settings: &JwtSettings) -> Self {
        let decoding_key = DecodingKey::from_secret(settings.secret());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = hmac_algorithms(settings.secret().len());
        // exp/nbf are compared in `validate_at` against one clock reading.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify signature, structure and expiry. Every failure collapses into [`InvalidToken`].
    pub fn validate(&self, token: &str) -> Result<Claims, InvalidToken> {
        let now = Utc::now().timestamp();

        self.validate_at(token, now).map_err(|cause| {
            debug!(%cause, "JWT token validation failed");
            InvalidToken
        })
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.validate(token).is_ok()
    }

    // The extractors revalidate on every call. `None` means "invalid token" or
    // "claim absent"; call `is_valid` first when the difference matters.

    pub fn extract_username(&self, token: &str) -> Option<String> {
        self.validate(token).ok().and_then(|c| c.subject)
    }

    pub fn extract_user_id(&self, token: &str) -> Option<i64> {
        self.validate(token).ok().and_then(|c| c.user_id)
    }

    pub fn extract_permissions(&self, token: &str) -> Option<Vec<String>> {
        self.validate(token).ok().and_then(|c| c.permissions)
    }

    pub fn extract_roles(&self, token: &str) -> Option<Vec<String>> {
        self.validate(token).ok().and_then(|c| c.roles)
    }

    fn validate_at(&self, token: &str, now: i64) -> Result<Claims, Rejected> {
        let raw =
            jsonwebtoken::decode::<RawClaims>(token, &self.decoding_key, &self.validation)?.claims;

        if now >= raw.exp {
            return Err(Rejected::Expired { exp: raw.exp, now });
        }
        if let Some(nbf) = raw.nbf {
            if now < nbf {
                return Err(Rejected::NotYetValid { nbf, now });
            }
        }

        Ok(Claims {
            subject: raw.sub,
            user_id: raw.user_id,
            permissions: raw.permissions,
            roles: raw.roles,
            expires_at: timestamp(raw.exp)?,
            issued_at: raw.iat.map(timestamp).transpose()?,
        })
    }
}
