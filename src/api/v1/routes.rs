/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証は app 側で Router 全体に掛ける (ここでは route ごとに掛けない)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::users::me;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/users/me", get(me))
}
