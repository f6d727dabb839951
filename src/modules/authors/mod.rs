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

use service::AuthorService;

/// Authors module: `/authors` CRUD plus age filters
pub struct AuthorsModule {
    service: AuthorService,
}

impl AuthorsModule {
    pub fn new(service: AuthorService) -> Self {
        Self { service }
    }
}

/// Schema owned by the authors module
pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_init",
        up: r#"
            CREATE TABLE IF NOT EXISTS author (
                id   INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT    NOT NULL,
                age  INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS author_age_idx ON author (age);
            "#,
    }]
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({ "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } });
        let author = json!({ "application/json": { "schema": { "$ref": "#/components/schemas/Author" } } });
        let id_param = json!({
            "name": "id", "in": "path", "required": true, "schema": { "type": "integer" }
        });

        Some(json!({
            "paths": {
                "/authors": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "parameters": [
                            { "name": "age_lt", "in": "query", "required": false, "schema": { "type": "integer" } },
                            { "name": "age_gt", "in": "query", "required": false, "schema": { "type": "integer" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "List of authors",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Author" } }
                                    }
                                }
                            },
                            "400": { "description": "Conflicting filters", "content": error }
                        }
                    },
                    "post": {
                        "summary": "Create author",
                        "tags": ["Authors"],
                        "requestBody": { "required": true, "content": author },
                        "responses": {
                            "201": { "description": "Created author", "content": author },
                            "422": { "description": "Validation error", "content": error }
                        }
                    }
                },
                "/authors/{id}": {
                    "get": {
                        "summary": "Get author",
                        "tags": ["Authors"],
                        "parameters": [id_param],
                        "responses": {
                            "200": { "description": "Author", "content": author },
                            "404": { "description": "Author not found", "content": error }
                        }
                    },
                    "put": {
                        "summary": "Replace author",
                        "tags": ["Authors"],
                        "parameters": [id_param],
                        "requestBody": { "required": true, "content": author },
                        "responses": {
                            "200": { "description": "Updated author", "content": author },
                            "404": { "description": "Author not found", "content": error }
                        }
                    },
                    "delete": {
                        "summary": "Delete author",
                        "tags": ["Authors"],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": { "description": "Author not found", "content": error }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "description": "Generated identifier" },
                            "name": { "type": "string" },
                            "age": { "type": "integer" }
                        },
                        "required": ["name", "age"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        migrations()
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new instance of the authors module
pub fn create_module(service: AuthorService) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(service))
}
