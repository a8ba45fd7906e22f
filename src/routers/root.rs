use axum::Json;

use crate::controllers;
use crate::models::song::Health;

pub async fn health_route() -> Json<Health> {
    Json(controllers::root::health())
}
