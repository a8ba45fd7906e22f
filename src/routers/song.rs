use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::controllers::song as controller;
use crate::error::ApiError;
use crate::models::song::{SongCount, SongList};
use crate::routers::AppState;

pub async fn count_route(State(state): State<AppState>) -> Result<Json<SongCount>, ApiError> {
    Ok(Json(controller::count(state.store.as_ref()).await?))
}

pub async fn list_route(State(state): State<AppState>) -> Result<Json<SongList>, ApiError> {
    Ok(Json(controller::list(state.store.as_ref()).await?))
}

pub async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(controller::get(state.store.as_ref(), id).await?))
}

pub async fn create_route(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let inserted = controller::create(state.store.as_ref(), body).await?;
    Ok((StatusCode::CREATED, Json(inserted)).into_response())
}

pub async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    match controller::update(state.store.as_ref(), id, body).await? {
        Some(song) => Ok(Json(song)),
        None => Ok(Json(json!({"message": "song found, but nothing updated"}))),
    }
}

pub async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    controller::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
