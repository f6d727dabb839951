//! HTTP handlers for `/books`.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use shelf_http::{
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
};

use super::models::{BookDto, BookEntity, PageRequest};
use super::service::BookService;

pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

async fn create_book(
    State(service): State<BookService>,
    ApiJson(book): ApiJson<BookDto>,
) -> AppResult<(StatusCode, Json<BookDto>)> {
    let isbn = book.isbn.clone().unwrap_or_default();
    let saved = service.create_book(BookEntity::from_dto(isbn, book)).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

async fn list_books(
    State(service): State<BookService>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> AppResult<Json<Vec<BookDto>>> {
    let books = service.list_books(&page).await?;
    Ok(Json(books.into_iter().map(BookDto::from).collect()))
}

async fn get_book(
    State(service): State<BookService>,
    ApiPath(isbn): ApiPath<String>,
) -> AppResult<Json<BookDto>> {
    Ok(Json(service.get_book(&isbn).await?.into()))
}

async fn update_book(
    State(service): State<BookService>,
    ApiPath(isbn): ApiPath<String>,
    ApiJson(book): ApiJson<BookDto>,
) -> AppResult<Json<BookDto>> {
    let updated = service.update_book(BookEntity::from_dto(isbn, book)).await?;
    Ok(Json(updated.into()))
}

async fn delete_book(
    State(service): State<BookService>,
    ApiPath(isbn): ApiPath<String>,
) -> AppResult<StatusCode> {
    service.delete_book(&isbn).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::authors::repository::{AuthorRepository, SqlAuthorRepository};
    use crate::modules::books::repository::SqlBookRepository;
    use crate::test_support::{author_a, migrated_db, read_json, send};
    use serde_json::json;
    use std::sync::Arc;

    async fn app() -> (Router, i64) {
        let db = migrated_db().await;
        let authors = Arc::new(SqlAuthorRepository::new(db.pool().clone()));
        let author_id = authors.save(&author_a()).await.unwrap().id.unwrap();
        let books = Arc::new(SqlBookRepository::new(db.pool().clone()));
        (router(BookService::new(books, authors)), author_id)
    }

    fn book_json(isbn: &str, title: &str, author_id: i64) -> serde_json::Value {
        json!({ "isbn": isbn, "title": title, "author": { "id": author_id, "name": "Abigail Rose", "age": 80 } })
    }

    #[tokio::test]
    async fn create_book_returns_201_with_nested_author() {
        let (app, author_id) = app().await;

        let response = send(
            &app,
            "POST",
            "/books",
            Some(book_json("978-1-2345-6789-0", "The Shadow in the Attic", author_id)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = read_json(response).await;
        assert_eq!(body["isbn"], "978-1-2345-6789-0");
        assert_eq!(body["title"], "The Shadow in the Attic");
        assert_eq!(body["author"]["id"], author_id);
        assert_eq!(body["author"]["name"], "Abigail Rose");
    }

    #[tokio::test]
    async fn create_without_author_leaves_book_unlinked() {
        let (app, _) = app().await;

        let response = send(
            &app,
            "POST",
            "/books",
            Some(json!({ "isbn": "978-0-0000-0000-1", "title": "Anonymous" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(read_json(response).await["author"].is_null());
    }

    #[tokio::test]
    async fn duplicate_isbn_is_409_and_missing_isbn_is_422() {
        let (app, author_id) = app().await;
        let book = book_json("978-1-2345-6789-0", "First", author_id);

        assert_eq!(
            send(&app, "POST", "/books", Some(book.clone())).await.status(),
            StatusCode::CREATED
        );
        assert_eq!(
            send(&app, "POST", "/books", Some(book)).await.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            send(&app, "POST", "/books", Some(json!({ "title": "No isbn" })))
                .await
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn unknown_author_is_422() {
        let (app, _) = app().await;
        let response = send(
            &app,
            "POST",
            "/books",
            Some(book_json("978-1-2345-6789-0", "Ghost written", 4040)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn get_update_delete_by_isbn() {
        let (app, author_id) = app().await;
        send(
            &app,
            "POST",
            "/books",
            Some(book_json("978-1-2345-6789-1", "Beyond the Horizon", author_id)),
        )
        .await;
        let path = "/books/978-1-2345-6789-1";

        let fetched = read_json(send(&app, "GET", path, None).await).await;
        assert_eq!(fetched["title"], "Beyond the Horizon");
        assert_eq!(fetched["author"]["name"], "Abigail Rose");

        let response = send(&app, "PUT", path, Some(json!({ "title": "UPDATED" }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = read_json(response).await;
        assert_eq!(updated["isbn"], "978-1-2345-6789-1");
        assert_eq!(updated["title"], "UPDATED");
        assert!(updated["author"].is_null());

        assert_eq!(
            send(&app, "DELETE", path, None).await.status(),
            StatusCode::NO_CONTENT
        );
        assert_eq!(send(&app, "GET", path, None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            send(&app, "DELETE", path, None).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn update_of_unknown_isbn_is_404() {
        let (app, _) = app().await;
        let response = send(
            &app,
            "PUT",
            "/books/978-9-9999-9999-9",
            Some(json!({ "title": "Never written" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_supports_paging() {
        let (app, author_id) = app().await;
        for (isbn, title) in [
            ("978-1-2345-6789-0", "A"),
            ("978-1-2345-6789-1", "B"),
            ("978-1-2345-6789-2", "C"),
        ] {
            send(&app, "POST", "/books", Some(book_json(isbn, title, author_id))).await;
        }

        let all = read_json(send(&app, "GET", "/books", None).await).await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let page = read_json(send(&app, "GET", "/books?page=1&size=2", None).await).await;
        let page = page.as_array().unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["isbn"], "978-1-2345-6789-2");

        assert_eq!(
            send(&app, "GET", "/books?size=0", None).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
}
