use serde::{Deserialize, Serialize};

use crate::modules::authors::models::{AuthorDto, AuthorEntity};

/// Row of the `book` table, with the linked author resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntity {
    /// Caller-supplied primary key
    pub isbn: String,
    pub title: String,
    pub author_entity: Option<AuthorEntity>,
}

/// Book as exchanged over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDto {
    #[serde(default)]
    pub isbn: Option<String>,
    pub title: String,
    #[serde(default)]
    pub author: Option<AuthorDto>,
}

/// Optional slice of `GET /books`; `page` is zero-based.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 20;
}
