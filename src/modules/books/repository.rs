use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use shelf_db::DbResult;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use super::models::BookEntity;
use crate::modules::authors::models::AuthorEntity;

/// Data access over the `book` table.
///
/// Reads always resolve the linked author.
#[async_trait]
pub trait BookRepository: Debug {
    /// Insert only; an existing isbn fails with [`DbError::Constraint`](shelf_db::DbError::Constraint).
    async fn insert(&self, book: &BookEntity) -> DbResult<BookEntity>;

    /// Upsert by isbn.
    async fn save(&self, book: &BookEntity) -> DbResult<BookEntity>;

    /// Replaces the row with the same isbn, `None` if there is none.
    async fn update(&self, book: &BookEntity) -> DbResult<Option<BookEntity>>;

    async fn find_by_id(&self, isbn: &str) -> DbResult<Option<BookEntity>>;

    /// Every book, ordered by isbn.
    async fn find_all(&self) -> DbResult<Vec<BookEntity>>;

    /// One zero-based page of [`find_all`](Self::find_all).
    async fn find_page(&self, page: u32, size: u32) -> DbResult<Vec<BookEntity>>;

    /// Returns `true` if a row was removed. Deleting a missing isbn is not an error.
    async fn delete_by_id(&self, isbn: &str) -> DbResult<bool>;
}

pub type BookRepositoryArc = Arc<dyn BookRepository + Send + Sync>;

const SELECT_BOOKS: &str = "
    SELECT b.isbn, b.title, a.id AS author_id, a.name AS author_name, a.age AS author_age
    FROM book b
    LEFT JOIN author a ON a.id = b.author_id";

#[derive(Debug, FromRow)]
struct BookRow {
    isbn: String,
    title: String,
    author_id: Option<i64>,
    author_name: Option<String>,
    author_age: Option<i32>,
}

impl From<BookRow> for BookEntity {
    fn from(row: BookRow) -> Self {
        let author_entity = match (row.author_id, row.author_name, row.author_age) {
            (Some(id), Some(name), Some(age)) => Some(AuthorEntity {
                id: Some(id),
                name,
                age,
            }),
            _ => None,
        };

        Self {
            isbn: row.isbn,
            title: row.title,
            author_entity,
        }
    }
}

/// SQLite-backed [`BookRepository`].
#[derive(Debug, Clone)]
pub struct SqlBookRepository {
    pool: SqlitePool,
}

impl SqlBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn select_one(conn: &mut SqliteConnection, isbn: &str) -> DbResult<Option<BookEntity>> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOKS} WHERE b.isbn = ?"))
            .bind(isbn)
            .fetch_optional(conn)
            .await?;
        Ok(row.map(BookEntity::from))
    }
}

fn author_id(book: &BookEntity) -> Option<i64> {
    book.author_entity.as_ref().and_then(|author| author.id)
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn insert(&self, book: &BookEntity) -> DbResult<BookEntity> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO book (isbn, title, author_id) VALUES (?, ?, ?)")
            .bind(&book.isbn)
            .bind(&book.title)
            .bind(author_id(book))
            .execute(&mut *tx)
            .await?;

        let inserted = Self::select_one(&mut tx, &book.isbn)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;

        tracing::debug!(isbn = %inserted.isbn, "book inserted");
        Ok(inserted)
    }

    async fn save(&self, book: &BookEntity) -> DbResult<BookEntity> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO book (isbn, title, author_id) VALUES (?, ?, ?)
             ON CONFLICT(isbn) DO UPDATE SET title = excluded.title, author_id = excluded.author_id",
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(author_id(book))
        .execute(&mut *tx)
        .await?;

        let saved = Self::select_one(&mut tx, &book.isbn)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        tx.commit().await?;

        tracing::debug!(isbn = %saved.isbn, "book saved");
        Ok(saved)
    }

    async fn update(&self, book: &BookEntity) -> DbResult<Option<BookEntity>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE book SET title = ?, author_id = ? WHERE isbn = ?")
            .bind(&book.title)
            .bind(author_id(book))
            .bind(&book.isbn)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let updated = Self::select_one(&mut tx, &book.isbn).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn find_by_id(&self, isbn: &str) -> DbResult<Option<BookEntity>> {
        let mut conn = self.pool.acquire().await?;
        Self::select_one(&mut conn, isbn).await
    }

    async fn find_all(&self) -> DbResult<Vec<BookEntity>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("{SELECT_BOOKS} ORDER BY b.isbn"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BookEntity::from).collect())
    }

    async fn find_page(&self, page: u32, size: u32) -> DbResult<Vec<BookEntity>> {
        let offset = i64::from(page) * i64::from(size);
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{SELECT_BOOKS} ORDER BY b.isbn LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BookEntity::from).collect())
    }

    async fn delete_by_id(&self, isbn: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM book WHERE isbn = ?")
            .bind(isbn)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
