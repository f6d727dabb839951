use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use shelf_db::DbResult;
use sqlx::SqlitePool;

use super::models::AuthorEntity;

/// Data access over the `author` table.
#[async_trait]
pub trait AuthorRepository: Debug {
    /// Upsert by id: inserts when `id` is `None` or unknown, replaces otherwise.
    async fn save(&self, author: &AuthorEntity) -> DbResult<AuthorEntity>;

    /// Replaces the row with the same id.
    ///
    /// # Returns
    ///
    /// `None` when the author has no id or no row matches it.
    async fn update(&self, author: &AuthorEntity) -> DbResult<Option<AuthorEntity>>;

    async fn find_by_id(&self, id: i64) -> DbResult<Option<AuthorEntity>>;

    /// Every author, ordered by id.
    async fn find_all(&self) -> DbResult<Vec<AuthorEntity>>;

    /// Returns `true` if a row was removed. Deleting a missing id is not an error.
    async fn delete_by_id(&self, id: i64) -> DbResult<bool>;

    /// Authors with `age < threshold`.
    async fn age_less_than(&self, threshold: i32) -> DbResult<Vec<AuthorEntity>>;

    /// Authors with `age > threshold`.
    async fn age_greater_than(&self, threshold: i32) -> DbResult<Vec<AuthorEntity>>;
}

pub type AuthorRepositoryArc = Arc<dyn AuthorRepository + Send + Sync>;

/// SQLite-backed [`AuthorRepository`].
#[derive(Debug, Clone)]
pub struct SqlAuthorRepository {
    pool: SqlitePool,
}

impl SqlAuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for SqlAuthorRepository {
    async fn save(&self, author: &AuthorEntity) -> DbResult<AuthorEntity> {
        let saved = sqlx::query_as::<_, AuthorEntity>(
            "INSERT INTO author (id, name, age) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, age = excluded.age
             RETURNING id, name, age",
        )
        .bind(author.id)
        .bind(&author.name)
        .bind(author.age)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(author_id = ?saved.id, "author saved");
        Ok(saved)
    }

    async fn update(&self, author: &AuthorEntity) -> DbResult<Option<AuthorEntity>> {
        let Some(id) = author.id else {
            return Ok(None);
        };

        let updated = sqlx::query_as::<_, AuthorEntity>(
            "UPDATE author SET name = ?, age = ? WHERE id = ? RETURNING id, name, age",
        )
        .bind(&author.name)
        .bind(author.age)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<AuthorEntity>> {
        let author =
            sqlx::query_as::<_, AuthorEntity>("SELECT id, name, age FROM author WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(author)
    }

    async fn find_all(&self) -> DbResult<Vec<AuthorEntity>> {
        let authors =
            sqlx::query_as::<_, AuthorEntity>("SELECT id, name, age FROM author ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(authors)
    }

    async fn delete_by_id(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM author WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn age_less_than(&self, threshold: i32) -> DbResult<Vec<AuthorEntity>> {
        let authors = sqlx::query_as::<_, AuthorEntity>(
            "SELECT id, name, age FROM author WHERE age < ? ORDER BY id",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    async fn age_greater_than(&self, threshold: i32) -> DbResult<Vec<AuthorEntity>> {
        let authors = sqlx::query_as::<_, AuthorEntity>(
            "SELECT id, name, age FROM author WHERE age > ? ORDER BY id",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{author_a, author_b, author_c, migrated_db};

    async fn repository() -> SqlAuthorRepository {
        SqlAuthorRepository::new(migrated_db().await.pool().clone())
    }

    fn names(authors: &[AuthorEntity]) -> Vec<&str> {
        let mut names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    #[tokio::test]
    async fn author_can_be_created_and_recalled() {
        let repo = repository().await;
        let saved = repo.save(&author_a()).await.unwrap();

        let id = saved.id.expect("generated id");
        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Abigail Rose");
        assert_eq!(found.age, 80);
    }

    #[tokio::test]
    async fn multiple_authors_can_be_created_and_recalled() {
        let repo = repository().await;
        for author in [author_a(), author_b(), author_c()] {
            repo.save(&author).await.unwrap();
        }

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(
            names(&all),
            vec!["Abigail Rose", "Jesse A Casey", "Thomas Cronin"]
        );
    }

    #[tokio::test]
    async fn saving_existing_author_updates_in_place() {
        let repo = repository().await;
        let mut saved = repo.save(&author_a()).await.unwrap();

        saved.name = "UPDATED".to_string();
        let updated = repo.save(&saved).await.unwrap();
        assert_eq!(updated.id, saved.id);

        let found = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(found.name, "UPDATED");
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_only_touches_existing_rows() {
        let repo = repository().await;
        let missing = AuthorEntity {
            id: Some(999),
            ..author_b()
        };
        assert!(repo.update(&missing).await.unwrap().is_none());
        assert!(repo.update(&author_b()).await.unwrap().is_none());
        assert!(repo.find_all().await.unwrap().is_empty());

        let mut saved = repo.save(&author_b()).await.unwrap();
        saved.age = 45;
        let updated = repo.update(&saved).await.unwrap().unwrap();
        assert_eq!(updated.age, 45);
    }

    #[tokio::test]
    async fn author_can_be_deleted() {
        let repo = repository().await;
        let saved = repo.save(&author_a()).await.unwrap();
        let id = saved.id.unwrap();

        assert!(repo.delete_by_id(id).await.unwrap());
        assert!(repo.find_by_id(id).await.unwrap().is_none());
        assert!(!repo.delete_by_id(id).await.unwrap());
    }

    #[tokio::test]
    async fn age_filters_are_strict() {
        let repo = repository().await;
        for author in [author_a(), author_b(), author_c()] {
            repo.save(&author).await.unwrap();
        }
        repo.save(&AuthorEntity {
            id: None,
            name: "Exactly Fifty".to_string(),
            age: 50,
        })
        .await
        .unwrap();

        let younger = repo.age_less_than(50).await.unwrap();
        assert_eq!(names(&younger), vec!["Jesse A Casey", "Thomas Cronin"]);

        let older = repo.age_greater_than(50).await.unwrap();
        assert_eq!(names(&older), vec!["Abigail Rose"]);
    }
}
