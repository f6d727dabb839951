use shelf_http::error::{AppError, AppResult};

use super::models::{AuthorEntity, AuthorFilter};
use super::repository::AuthorRepositoryArc;

/// Author use cases on top of an [`AuthorRepository`](super::repository::AuthorRepository).
#[derive(Debug, Clone)]
pub struct AuthorService {
    repository: AuthorRepositoryArc,
}

impl AuthorService {
    pub fn new(repository: AuthorRepositoryArc) -> Self {
        Self { repository }
    }

    /// Persist a new author; any caller-supplied id is discarded.
    pub async fn create_author(&self, author: AuthorEntity) -> AppResult<AuthorEntity> {
        let author = AuthorEntity { id: None, ..author };
        let saved = self.repository.save(&author).await?;
        tracing::info!(author_id = ?saved.id, "author created");
        Ok(saved)
    }

    pub async fn list_authors(&self, filter: &AuthorFilter) -> AppResult<Vec<AuthorEntity>> {
        let authors = match (filter.age_lt, filter.age_gt) {
            (Some(_), Some(_)) => {
                return Err(AppError::bad_request(
                    "age_lt and age_gt cannot be combined",
                ))
            }
            (Some(threshold), None) => self.repository.age_less_than(threshold).await?,
            (None, Some(threshold)) => self.repository.age_greater_than(threshold).await?,
            (None, None) => self.repository.find_all().await?,
        };
        Ok(authors)
    }

    pub async fn get_author(&self, id: i64) -> AppResult<AuthorEntity> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| author_not_found(id))
    }

    /// Replace every field of an existing author.
    pub async fn update_author(&self, id: i64, author: AuthorEntity) -> AppResult<AuthorEntity> {
        let author = AuthorEntity {
            id: Some(id),
            ..author
        };
        let updated = self
            .repository
            .update(&author)
            .await?
            .ok_or_else(|| author_not_found(id))?;
        tracing::info!(author_id = id, "author updated");
        Ok(updated)
    }

    /// Remove an author; their books stay and lose the link.
    pub async fn delete_author(&self, id: i64) -> AppResult<()> {
        if !self.repository.delete_by_id(id).await? {
            return Err(author_not_found(id));
        }
        tracing::info!(author_id = id, "author deleted");
        Ok(())
    }
}

fn author_not_found(id: i64) -> AppError {
    AppError::not_found(format!("author {id} not found"))
}
