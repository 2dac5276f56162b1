use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,                // trimmed + lowercased
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 PHC string
    pub created_at: OffsetDateTime,
}
