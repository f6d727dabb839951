pub mod mapper;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Migration, Module};

use service::BookService;

/// Books module: `/books` CRUD keyed by isbn
pub struct BooksModule {
    service: BookService,
}

impl BooksModule {
    pub fn new(service: BookService) -> Self {
        Self { service }
    }
}

/// Schema owned by the books module; authors keep their books on delete
pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_init",
        up: r#"
            CREATE TABLE IF NOT EXISTS book (
                isbn      TEXT    PRIMARY KEY NOT NULL,
                title     TEXT    NOT NULL,
                author_id INTEGER NULL REFERENCES author (id) ON DELETE SET NULL
            );
            CREATE INDEX IF NOT EXISTS book_author_idx ON book (author_id);
            "#,
    }]
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({ "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } });
        let book = json!({ "application/json": { "schema": { "$ref": "#/components/schemas/Book" } } });
        let isbn_param = json!({ "name": "isbn", "in": "path", "required": true, "schema": { "type": "string" } });

        Some(json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "page", "in": "query", "required": false, "schema": { "type": "integer", "minimum": 0 } },
                            { "name": "size", "in": "query", "required": false, "schema": { "type": "integer", "minimum": 1 } }
                        ],
                        "responses": {
                            "200": {
                                "description": "List of books",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                                    }
                                }
                            },
                            "400": { "description": "Invalid page request", "content": error }
                        }
                    },
                    "post": {
                        "summary": "Create book",
                        "tags": ["Books"],
                        "requestBody": { "required": true, "content": book },
                        "responses": {
                            "201": { "description": "Created book", "content": book },
                            "409": { "description": "ISBN already exists", "content": error },
                            "422": { "description": "Validation error", "content": error }
                        }
                    }
                },
                "/books/{isbn}": {
                    "get": {
                        "summary": "Get book",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "responses": {
                            "200": { "description": "Book", "content": book },
                            "404": { "description": "Book not found", "content": error }
                        }
                    },
                    "put": {
                        "summary": "Replace book",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "requestBody": { "required": true, "content": book },
                        "responses": {
                            "200": { "description": "Updated book", "content": book },
                            "404": { "description": "Book not found", "content": error },
                            "422": { "description": "Validation error", "content": error }
                        }
                    },
                    "delete": {
                        "summary": "Delete book",
                        "tags": ["Books"],
                        "parameters": [isbn_param],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": { "description": "Book not found", "content": error }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string", "description": "ISBN, the primary key" },
                            "title": { "type": "string" },
                            "author": { "$ref": "#/components/schemas/Author" }
                        },
                        "required": ["title"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        migrations()
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(service: BookService) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(service))
}
