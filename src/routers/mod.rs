use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::SongStore;

pub mod root;
pub mod song;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SongStore>,
}

/// Build the application router around a shared store handle.
pub fn app(store: Arc<dyn SongStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(root::health_route))
        .route("/count", get(song::count_route))
        .route("/song", get(song::list_route).post(song::create_route))
        .route(
            "/song/{id}",
            get(song::get_route)
                .put(song::update_route)
                .delete(song::delete_route),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}
