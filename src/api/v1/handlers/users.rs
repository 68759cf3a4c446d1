/*
 * Responsibility
 * - GET /users/me
 * - gate が付与した X-User-* ヘッダを extractor 経由で受け取り、そのまま返す
 */
use axum::Json;

use crate::api::v1::dto::users::MeResponse;
use crate::api::v1::extractors::ForwardedIdentityExtractor;

pub async fn me(
    ForwardedIdentityExtractor(identity): ForwardedIdentityExtractor,
) -> Json<MeResponse> {
    Json(MeResponse {
        email: identity.email,
        user_id: identity.user_id,
        permissions: identity.permissions,
        roles: identity.roles,
    })
}
