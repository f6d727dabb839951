//! Conversions between [`AuthorEntity`] and [`AuthorDto`].

use super::models::{AuthorDto, AuthorEntity};

impl From<AuthorEntity> for AuthorDto {
    fn from(entity: AuthorEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            age: entity.age,
        }
    }
}

impl From<AuthorDto> for AuthorEntity {
    fn from(dto: AuthorDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            age: dto.age,
        }
    }
}
