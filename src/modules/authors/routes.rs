//! HTTP handlers for `/authors`.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shelf_http::{
    error::AppResult,
    extract::{ApiJson, ApiPath, ApiQuery},
};

use super::models::{AuthorDto, AuthorFilter};
use super::service::AuthorService;

pub fn router(service: AuthorService) -> Router {
    Router::new()
        .route("/authors", get(list_authors).post(create_author))
        .route(
            "/authors/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .with_state(service)
}

async fn create_author(
    State(service): State<AuthorService>,
    ApiJson(author): ApiJson<AuthorDto>,
) -> AppResult<(StatusCode, Json<AuthorDto>)> {
    let saved = service.create_author(author.into()).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

async fn list_authors(
    State(service): State<AuthorService>,
    ApiQuery(filter): ApiQuery<AuthorFilter>,
) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = service.list_authors(&filter).await?;
    Ok(Json(authors.into_iter().map(AuthorDto::from).collect()))
}

async fn get_author(
    State(service): State<AuthorService>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<AuthorDto>> {
    Ok(Json(service.get_author(id).await?.into()))
}

async fn update_author(
    State(service): State<AuthorService>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(author): ApiJson<AuthorDto>,
) -> AppResult<Json<AuthorDto>> {
    let updated = service.update_author(id, author.into()).await?;
    Ok(Json(updated.into()))
}

async fn delete_author(
    State(service): State<AuthorService>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    service.delete_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
