use serde::{Deserialize, Serialize};

/// Row of the `author` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AuthorEntity {
    /// Generated on first save
    pub id: Option<i64>,
    pub name: String,
    pub age: i32,
}

/// Author as exchanged over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub age: i32,
}

/// Query string accepted by `GET /authors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorFilter {
    /// Only authors strictly younger than this
    pub age_lt: Option<i32>,
    /// Only authors strictly older than this
    pub age_gt: Option<i32>,
}
