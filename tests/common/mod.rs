#![allow(dead_code)]

use auth_gateway::{app, config::Config};
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret-key-with-at-least-32-bytes";
pub const OTHER_SECRET: &str = "a-completely-different-key-with-32-plus-bytes";

pub fn test_app() -> Router {
    let config = Config::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        "JWT_EXPIRATION" => Some("3600000".to_string()),
        _ => None,
    })
    .expect("test config");

    app::build_router(app::build_state(&config))
}

pub fn claims() -> Value {
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

pub fn expired_claims() -> Value {
    let now = Utc::now().timestamp();
    json!({
        "sub": "test@example.com",
        "userId": 123,
        "iat": now - 7200,
        "exp": now - 3600,
    })
}

pub fn sign(claims: &Value) -> String {
    sign_with(Algorithm::HS256, SECRET, claims)
}

pub fn sign_with(alg: Algorithm, secret: &str, claims: &Value) -> String {
    jsonwebtoken::encode(
        &Header::new(alg),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

pub fn get(path: &str, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(req: Request<Body>) -> Response<Body> {
    test_app().oneshot(req).await.unwrap()
}

pub async fn json_body(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send `req` and assert a 401 carrying `message`.
pub async fn assert_unauthorized(req: Request<Body>, message: &str) {
    let resp = send(req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()["content-type"], "application/json");
    assert_eq!(
        json_body(resp).await,
        json!({ "error": "Unauthorized", "message": message })
    );
}
