/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: AuthenticationGate (中に Arc<TokenValidator>)
 * - Clone 前提で持つ (内部は Arc / Clone cheap)。起動後は read-only
 */
use std::sync::Arc;

use crate::middleware::auth::AuthenticationGate;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gate: Arc<AuthenticationGate>,
}

impl AppState {
    pub fn new(gate: Arc<AuthenticationGate>) -> Self {
        Self { gate }
    }
}
