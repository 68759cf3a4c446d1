/*!
 * Forwarded identity extractor
 *
 * Responsibility:
 * - gate が設定した X-User-* ヘッダを handler 向けの型 (ForwardedIdentity) に戻す
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - ForwardedIdentity
 * - ForwardedIdentityExtractor
 */

mod core;
mod types;

pub use self::core::ForwardedIdentityExtractor;
pub use types::ForwardedIdentity;
