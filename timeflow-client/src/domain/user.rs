use serde::Deserialize;

use crate::Role;

/// The authenticated user, as returned by `GET /api/auth/loggedinuser`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggedInUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub role: Role,
}
