//! Conversions between [`BookEntity`] and [`BookDto`].
//!
//! The entity's `author_entity` is exposed as the DTO's `author`.

use super::models::{BookDto, BookEntity};
use crate::modules::authors::models::{AuthorDto, AuthorEntity};

impl From<BookEntity> for BookDto {
    fn from(entity: BookEntity) -> Self {
        Self {
            isbn: Some(entity.isbn),
            title: entity.title,
            author: entity.author_entity.map(AuthorDto::from),
        }
    }
}

impl BookEntity {
    /// Build an entity keyed by `isbn`; the DTO's own isbn is ignored.
    pub fn from_dto(isbn: String, dto: BookDto) -> Self {
        Self {
            isbn,
            title: dto.title,
            author_entity: dto.author.map(AuthorEntity::from),
        }
    }
}
