use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                    // store-assigned unique ID
    pub email: String,              // lookup key, exact match
    #[serde(skip_serializing)]
    pub password: String,           // "<salt>.<hash>" composite, not exposed in JSON
    pub created_at: OffsetDateTime, // creation timestamp
}

/// Partial update applied to an existing user. `None` fields are left as is.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
}
