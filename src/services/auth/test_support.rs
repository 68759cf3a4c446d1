//! Token minting for unit tests. Issuance exists only here.
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use crate::config::JwtSettings;
use crate::services::auth::TokenValidator;

pub const SECRET: &str = "test-secret-key-that-is-at-least-256-bits-long";
pub const LONG_SECRET: &str =
    "a-64-byte-secret-that-is-long-enough-for-every-hmac-sha-variant!";
pub const OTHER_SECRET: &str = "another-secret-key-that-is-also-256-bits-long!";

pub fn settings() -> JwtSettings {
    JwtSettings::new(SECRET, 3_600_000).expect("test settings")
}

pub fn validator() -> TokenValidator {
    TokenValidator::new(&settings())
}

pub fn valid_claims() -> Value {
    let now = Utc::now().timestamp();
    json!({
        "sub": "test@example.com",
        "userId": 123,
        "permissions": ["USER_VIEW", "DROPZONE_VIEW"],
        "roles": ["ADMIN"],
        "iat": now,
        "exp": now + 3600,
    })
}

pub fn mint(claims: &Value) -> String {
    mint_with(Algorithm::HS256, SECRET, claims)
}

pub fn mint_with(alg: Algorithm, secret: &str, claims: &Value) -> String {
    let mut header = Header::new(alg);
    header.typ = Some("JWT".to_string());
    jsonwebtoken::encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("failed to sign test JWT")
}
