//! Fixtures shared by the module tests.

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use shelf_db::Database;
use tower::ServiceExt;

use crate::modules::{authors, authors::models::AuthorEntity, books, books::models::BookEntity};

/// Fresh in-memory database with every module's schema applied.
pub async fn migrated_db() -> Database {
    let db = Database::in_memory().await.unwrap();
    let migrations: Vec<_> = authors::migrations()
        .into_iter()
        .map(|m| ("authors".to_string(), m))
        .chain(books::migrations().into_iter().map(|m| ("books".to_string(), m)))
        .collect();
    db.migrate(&migrations).await.unwrap();
    db
}

pub fn author_a() -> AuthorEntity {
    AuthorEntity {
        id: None,
        name: "Abigail Rose".to_string(),
        age: 80,
    }
}

pub fn author_b() -> AuthorEntity {
    AuthorEntity {
        id: None,
        name: "Thomas Cronin".to_string(),
        age: 44,
    }
}

pub fn author_c() -> AuthorEntity {
    AuthorEntity {
        id: None,
        name: "Jesse A Casey".to_string(),
        age: 24,
    }
}

fn book(isbn: &str, title: &str, author: &AuthorEntity) -> BookEntity {
    BookEntity {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author_entity: Some(author.clone()),
    }
}

pub fn book_a(author: &AuthorEntity) -> BookEntity {
    book("978-1-2345-6789-0", "The Shadow in the Attic", author)
}

pub fn book_b(author: &AuthorEntity) -> BookEntity {
    book("978-1-2345-6789-1", "Beyond the Horizon", author)
}

pub fn book_c(author: &AuthorEntity) -> BookEntity {
    book("978-1-2345-6789-2", "The Last Ember", author)
}

/// Drive one request through `app`, with an optional JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
