/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - auth: AuthenticationGate (Bearer 検証 → X-User-* ヘッダ付与)
 * - http: router 側の横断的関心事 (request id / trace / body limit / timeout)
 */
pub mod auth;
pub mod http;
