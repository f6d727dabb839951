use serde_json::json;
use shelf_http::error::{AppError, AppResult};

use super::models::{BookEntity, PageRequest};
use super::repository::BookRepositoryArc;
use crate::modules::authors::repository::AuthorRepositoryArc;

/// Book use cases, keyed by isbn.
#[derive(Debug, Clone)]
pub struct BookService {
    books: BookRepositoryArc,
    authors: AuthorRepositoryArc,
}

impl BookService {
    pub fn new(books: BookRepositoryArc, authors: AuthorRepositoryArc) -> Self {
        Self { books, authors }
    }

    /// Persist a new book; an existing isbn is a conflict, also under concurrent creates.
    pub async fn create_book(&self, book: BookEntity) -> AppResult<BookEntity> {
        if book.isbn.trim().is_empty() {
            return Err(AppError::validation(
                vec![json!({ "field": "isbn", "error": "required" })],
                "isbn is required",
            ));
        }
        if self.books.find_by_id(&book.isbn).await?.is_some() {
            return Err(AppError::conflict(
                vec![json!({ "isbn": book.isbn })],
                format!("book {} already exists", book.isbn),
            ));
        }
        let book = self.resolve_author(book).await?;

        let created = self.books.insert(&book).await?;
        tracing::info!(isbn = %created.isbn, "book created");
        Ok(created)
    }

    pub async fn list_books(&self, page: &PageRequest) -> AppResult<Vec<BookEntity>> {
        let books = match (page.page, page.size) {
            (None, None) => self.books.find_all().await?,
            (number, size) => {
                let size = size.unwrap_or(PageRequest::DEFAULT_SIZE);
                if size == 0 {
                    return Err(AppError::bad_request("size must be greater than zero"));
                }
                self.books.find_page(number.unwrap_or(0), size).await?
            }
        };
        Ok(books)
    }

    pub async fn get_book(&self, isbn: &str) -> AppResult<BookEntity> {
        self.books
            .find_by_id(isbn)
            .await?
            .ok_or_else(|| book_not_found(isbn))
    }

    /// Replace title and author link of an existing book.
    pub async fn update_book(&self, book: BookEntity) -> AppResult<BookEntity> {
        let book = self.resolve_author(book).await?;
        let isbn = book.isbn.clone();
        let updated = self
            .books
            .update(&book)
            .await?
            .ok_or_else(|| book_not_found(&isbn))?;
        tracing::info!(isbn = %updated.isbn, "book updated");
        Ok(updated)
    }

    pub async fn delete_book(&self, isbn: &str) -> AppResult<()> {
        if !self.books.delete_by_id(isbn).await? {
            return Err(book_not_found(isbn));
        }
        tracing::info!(isbn, "book deleted");
        Ok(())
    }

    /// A linked author must reference a stored author by id.
    async fn resolve_author(&self, book: BookEntity) -> AppResult<BookEntity> {
        let Some(author_id) = book.author_entity.as_ref().map(|author| author.id) else {
            return Ok(book);
        };
        let Some(id) = author_id else {
            return Err(AppError::validation(
                vec![json!({ "field": "author.id", "error": "required" })],
                "author must reference an existing author by id",
            ));
        };
        let stored = self.authors.find_by_id(id).await?.ok_or_else(|| {
            AppError::validation(
                vec![json!({ "field": "author.id", "error": "unknown", "value": id })],
                format!("author {id} does not exist"),
            )
        })?;

        Ok(BookEntity {
            author_entity: Some(stored),
            ..book
        })
    }
}

fn book_not_found(isbn: &str) -> AppError {
    AppError::not_found(format!("book {isbn} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::authors::models::AuthorEntity;
    use crate::modules::authors::repository::{AuthorRepository, SqlAuthorRepository};
    use crate::modules::books::repository::SqlBookRepository;
    use crate::test_support::{author_a, book_a, book_b, book_c, migrated_db};
    use axum::http::StatusCode;
    use std::sync::Arc;

    async fn setup() -> (BookService, AuthorEntity) {
        let db = migrated_db().await;
        let authors = Arc::new(SqlAuthorRepository::new(db.pool().clone()));
        let author = authors.save(&author_a()).await.unwrap();
        let books = Arc::new(SqlBookRepository::new(db.pool().clone()));
        (BookService::new(books, authors), author)
    }

    #[tokio::test]
    async fn create_then_get_returns_linked_author() {
        let (service, author) = setup().await;
        service.create_book(book_a(&author)).await.unwrap();

        let found = service.get_book("978-1-2345-6789-0").await.unwrap();
        assert_eq!(found.title, "The Shadow in the Attic");
        assert_eq!(found.author_entity.unwrap().name, "Abigail Rose");
    }

    #[tokio::test]
    async fn duplicate_isbn_is_conflict() {
        let (service, author) = setup().await;
        service.create_book(book_a(&author)).await.unwrap();

        let err = service.create_book(book_a(&author)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn concurrent_creates_of_same_isbn_yield_one_conflict() {
        let (service, author) = setup().await;
        let mut second = book_a(&author);
        second.title = "Overwritten".to_string();

        let (first, second) = tokio::join!(
            service.create_book(book_a(&author)),
            service.create_book(second)
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        let conflict = outcomes.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let winner = outcomes.iter().find_map(|r| r.as_ref().ok()).unwrap();
        let stored = service.get_book("978-1-2345-6789-0").await.unwrap();
        assert_eq!(stored.title, winner.title);
    }

    #[tokio::test]
    async fn author_reference_must_exist_and_carry_an_id() {
        let (service, author) = setup().await;

        let ghost = AuthorEntity {
            id: Some(999),
            ..author.clone()
        };
        let err = service.create_book(book_a(&ghost)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let unsaved = AuthorEntity { id: None, ..author };
        let err = service.create_book(book_b(&unsaved)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn stored_author_details_win_over_supplied_ones() {
        let (service, author) = setup().await;
        let stale = AuthorEntity {
            name: "Someone Else".to_string(),
            ..author
        };

        let saved = service.create_book(book_a(&stale)).await.unwrap();
        assert_eq!(saved.author_entity.unwrap().name, "Abigail Rose");
    }

    #[tokio::test]
    async fn list_pages_only_when_asked() {
        let (service, author) = setup().await;
        for book in [book_a(&author), book_b(&author), book_c(&author)] {
            service.create_book(book).await.unwrap();
        }

        assert_eq!(service.list_books(&PageRequest::default()).await.unwrap().len(), 3);

        let page = PageRequest {
            page: Some(1),
            size: Some(2),
        };
        assert_eq!(service.list_books(&page).await.unwrap().len(), 1);

        let zero = PageRequest {
            page: None,
            size: Some(0),
        };
        assert_eq!(
            service.list_books(&zero).await.unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_book_are_not_found() {
        let (service, author) = setup().await;

        let err = service.update_book(book_c(&author)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = service.delete_book("978-0-0000-0000-0").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
