//! Bearer-token admission for every routed request.
//!
//! Per request, first matching branch wins:
//! 1. public path → forward unchanged
//! 2. no `Authorization: Bearer ` header → 401
//! 3. empty token or fewer than two `.` → 401 (before any crypto work)
//! 4. signature/expiry check fails → 401
//! 5. otherwise set the `X-User-*` headers and forward
//!
//! The gate keeps no per-request state. Its only fields are the shared, read-only
//! validator and the compiled-in allowlist.

use std::{fmt, sync::Arc};

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tracing::debug;

use crate::error::AppError;
use crate::middleware::auth::{IdentityHeaders, is_public_path};
use crate::services::auth::TokenValidator;
use crate::state::AppState;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was turned away. Signature, expiry and decode failures are
/// deliberately folded into [`Rejection::InvalidToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingOrInvalidHeader,
    InvalidFormat,
    InvalidToken,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::MissingOrInvalidHeader => "Missing or invalid Authorization header",
            Rejection::InvalidFormat => "Invalid JWT token format",
            Rejection::InvalidToken => "Invalid or expired JWT token",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug)]
pub enum Admission {
    Public,
    Authenticated(IdentityHeaders),
    Rejected(Rejection),
}

#[derive(Debug, Clone)]
pub struct AuthenticationGate {
    validator: Arc<TokenValidator>,
}

impl AuthenticationGate {
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        Self { validator }
    }

    /// Decide what happens to a request to `path` carrying `headers`.
    pub fn admit(&self, path: &str, headers: &HeaderMap) -> Admission {
        if is_public_path(path) {
            debug!(path, "Skipping JWT authentication for public path");
            return Admission::Public;
        }

        match self.authenticate(path, headers) {
            Ok(identity) => Admission::Authenticated(identity),
            Err(rejection) => Admission::Rejected(rejection),
        }
    }

    fn authenticate(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<IdentityHeaders, Rejection> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .ok_or_else(|| {
                debug!(path, "Missing or invalid Authorization header");
                Rejection::MissingOrInvalidHeader
            })?;

        if token.is_empty() || token.matches('.').count() < 2 {
            debug!(path, "Invalid JWT token format");
            return Err(Rejection::InvalidFormat);
        }

        // One validation per request; all four headers come from the same claims.
        let claims = self.validator.validate(token).map_err(|_| {
            debug!(path, "JWT token validation failed");
            Rejection::InvalidToken
        })?;

        let identity = IdentityHeaders::from_claims(&claims).map_err(|err| {
            debug!(path, error = %err, "JWT claims are not valid header values");
            Rejection::InvalidToken
        })?;

        debug!(
            user = claims.subject().unwrap_or("unknown"),
            expires_at = %claims.expires_at(),
            issued_at = ?claims.issued_at(),
            "JWT authentication successful"
        );

        Ok(identity)
    }
}

/// Put the gate in front of every route (and the fallback) of `router`.
///
/// Call this after all routes are registered; anything added later is not covered.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    match state.gate.admit(original_uri.path(), req.headers()) {
        Admission::Public => Ok(next.run(req).await),
        Admission::Authenticated(identity) => {
            identity.apply(req.headers_mut());
            Ok(next.run(req).await)
        }
        Admission::Rejected(rejection) => Err(AppError::Unauthorized(rejection)),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        http::{HeaderName, HeaderValue, StatusCode},
        routing::get,
    };
    use chrono::Utc;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::auth::identity::{
        X_USER_EMAIL, X_USER_ID, X_USER_PERMISSIONS, X_USER_ROLES,
    };
    use crate::services::auth::test_support::{
        OTHER_SECRET, mint, mint_with, valid_claims, validator,
    };

    fn gate() -> AuthenticationGate {
        AuthenticationGate::new(Arc::new(validator()))
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    fn expired_token() -> String {
        let now = Utc::now().timestamp();
        mint(&json!({
            "sub": "test@example.com",
            "userId": 123,
            "iat": now - 7200,
            "exp": now - 3600,
        }))
    }

    fn rejected(admission: Admission) -> Rejection {
        match admission {
            Admission::Rejected(r) => r,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn public_paths_skip_credentials() {
        let gate = gate();
        let mut garbage = HeaderMap::new();
        garbage.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));

        for path in ["/api/v1/users/auth/token", "/actuator/health", "/webjars/a.css"] {
            assert!(matches!(gate.admit(path, &HeaderMap::new()), Admission::Public));
            assert!(matches!(gate.admit(path, &garbage), Admission::Public));
            assert!(matches!(
                gate.admit(path, &bearer(&expired_token())),
                Admission::Public
            ));
        }
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(
            rejected(gate().admit("/api/v1/users/me", &HeaderMap::new())),
            Rejection::MissingOrInvalidHeader
        );
    }

    #[test]
    fn non_bearer_schemes_are_rejected() {
        for value in [
            "Basic dXNlcjpwYXNz",
            "bearer a.b.c",
            "BEARER a.b.c",
            "Bearera.b.c",
            "Token a.b.c",
        ] {
            let mut headers = HeaderMap::new();
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
            assert_eq!(
                rejected(gate().admit("/api/v1/users/me", &headers)),
                Rejection::MissingOrInvalidHeader,
                "{value}"
            );
        }
    }

    #[test]
    fn non_ascii_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xffa.b.c").unwrap(),
        );
        assert_eq!(
            rejected(gate().admit("/api/v1/users/me", &headers)),
            Rejection::MissingOrInvalidHeader
        );
    }

    #[test]
    fn structurally_bad_tokens_are_rejected_before_crypto() {
        for token in ["", "   ", "not-a-jwt", "one.dot"] {
            assert_eq!(
                rejected(gate().admit("/api/v1/users/me", &bearer(token))),
                Rejection::InvalidFormat,
                "{token:?}"
            );
        }
    }

    #[test]
    fn cryptographically_bad_tokens_are_rejected() {
        let wrong_key = mint_with(jsonwebtoken::Algorithm::HS256, OTHER_SECRET, &valid_claims());
        for token in [expired_token(), wrong_key, "a.b.c".to_string()] {
            assert_eq!(
                rejected(gate().admit("/api/v1/users/me", &bearer(&token))),
                Rejection::InvalidToken
            );
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let token = mint(&valid_claims());
        let admission = gate().admit("/api/v1/users/me", &bearer(&format!("  {token}  ")));
        assert!(matches!(admission, Admission::Authenticated(_)));
    }

    #[test]
    fn valid_token_yields_identity() {
        let token = mint(&valid_claims());
        match gate().admit("/api/v1/users/me", &bearer(&token)) {
            Admission::Authenticated(identity) => {
                assert_eq!(identity.email(), "test@example.com");
            }
            other => panic!("expected authentication, got {other:?}"),
        }
    }

    #[test]
    fn rejection_messages_are_pinned() {
        assert_eq!(
            Rejection::MissingOrInvalidHeader.to_string(),
            "Missing or invalid Authorization header"
        );
        assert_eq!(Rejection::InvalidFormat.to_string(), "Invalid JWT token format");
        assert_eq!(Rejection::InvalidToken.to_string(), "Invalid or expired JWT token");
    }

    // -- Middleware --------------------------------------------------------------

    async fn echo(headers: HeaderMap) -> Json<Value> {
        let all = |name: HeaderName| {
            headers
                .get_all(name)
                .iter()
                .map(|v| v.to_str().unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        };
        Json(json!({
            "email": all(X_USER_EMAIL),
            "id": all(X_USER_ID),
            "permissions": all(X_USER_PERMISSIONS),
            "roles": all(X_USER_ROLES),
        }))
    }

    fn test_app() -> Router {
        let state = AppState::new(Arc::new(gate()));
        let router = Router::new()
            .route("/api/v1/users/me", get(echo))
            .route("/actuator/health", get(echo));
        apply(router, state.clone()).with_state(state)
    }

    async fn call(req: Request<Body>) -> (StatusCode, Value) {
        let resp = test_app().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn middleware_rewrites_spoofed_headers() {
        let token = mint(&valid_claims());
        let req = Request::builder()
            .uri("/api/v1/users/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header("X-User-Email", "attacker@example.com")
            .header("X-User-Roles", "SUPERUSER")
            .header("X-User-Roles", "ROOT")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], json!(["test@example.com"]));
        assert_eq!(body["id"], json!(["123"]));
        assert_eq!(body["permissions"], json!(["USER_VIEW,DROPZONE_VIEW"]));
        assert_eq!(body["roles"], json!(["ADMIN"]));
    }

    #[tokio::test]
    async fn middleware_forwards_public_paths_untouched() {
        let req = Request::builder()
            .uri("/actuator/health")
            .header("X-User-Email", "someone@example.com")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], json!(["someone@example.com"]));
        assert_eq!(body["id"], json!([]));
    }

    #[tokio::test]
    async fn middleware_rejects_with_json_body() {
        let req = Request::builder()
            .uri("/api/v1/users/me")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();

        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({ "error": "Unauthorized", "message": "Invalid JWT token format" })
        );
    }
}
