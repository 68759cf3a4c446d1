use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, HeaderName, StatusCode, request::Parts};

use crate::middleware::auth::identity::{
    X_USER_EMAIL, X_USER_ID, X_USER_PERMISSIONS, X_USER_ROLES,
};
use crate::state::AppState;

use super::ForwardedIdentity;

/// Handler で ForwardedIdentity を受け取るための extractor
/// gate が X-User-* を設定済みである前提。
/// 見つからない・読めない場合は 401 を返す（gate 未設定など）
pub struct ForwardedIdentityExtractor(pub ForwardedIdentity);

impl FromRequestParts<AppState> for ForwardedIdentityExtractor
where
    AppState: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parse(&parts.headers)
            .map(ForwardedIdentityExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

fn parse(headers: &HeaderMap) -> Option<ForwardedIdentity> {
    let email = text(headers, X_USER_EMAIL)?;
    let user_id = match text(headers, X_USER_ID)? {
        "" => None,
        raw => Some(raw.parse::<i64>().ok()?),
    };

    Some(ForwardedIdentity {
        email: (!email.is_empty()).then(|| email.to_string()),
        user_id,
        permissions: list(text(headers, X_USER_PERMISSIONS)?),
        roles: list(text(headers, X_USER_ROLES)?),
    })
}

fn text(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
