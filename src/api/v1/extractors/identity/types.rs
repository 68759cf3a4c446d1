/*
 * Responsibility
 * - Handler から見える「認証済みの呼び出し元」の型
 * - gate が X-User-* ヘッダに書いた値を、空文字 → None / カンマ区切り → Vec に戻したもの
 */

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardedIdentity {
    pub email: Option<String>,
    pub user_id: Option<i64>,
    pub permissions: Vec<String>,
    pub roles: Vec<String>,
}
