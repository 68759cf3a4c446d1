use serde::Serialize;

/// Identity as a backend sees it after the gate rewrote the request.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: Option<String>,
    pub user_id: Option<i64>,
    pub permissions: Vec<String>,
    pub roles: Vec<String>,
}
