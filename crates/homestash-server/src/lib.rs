//! Homestash Server - inventory REST API
//!
//! JSON over HTTP for locations, bins, shelves, tags and items.

pub mod error;
pub mod http;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    routing::{get, put},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use homestash_core::{ChildInput, ChildKind, InventoryStore, ServerConfig};

pub use error::ApiError;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn InventoryStore>, config: ServerConfig) -> Self {
        Self { store, config }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // System
        .route("/api/health", get(http::health))
        // Locations
        .route(
            "/api/locations",
            get(http::list_locations).post(http::create_location),
        )
        .route(
            "/api/locations/{id}",
            put(http::update_location).delete(http::delete_location),
        )
        // Tags
        .route("/api/tags", get(http::list_tags))
        // Items
        .route("/api/items", get(http::list_items).post(http::create_item))
        .route(
            "/api/items/{id}",
            put(http::update_item).delete(http::delete_item),
        );

    let router = with_child_routes(
        with_child_routes(router, "/api/bins", ChildKind::Bins),
        "/api/shelves",
        ChildKind::Shelves,
    );

    router
        .fallback(http::not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bins and shelves share handlers; `kind` picks the table.
fn with_child_routes(
    router: Router<Arc<AppState>>,
    base: &str,
    kind: ChildKind,
) -> Router<Arc<AppState>> {
    router
        .route(
            base,
            get(move |state: State<Arc<AppState>>| http::list_children(state, kind)).post(
                move |state: State<Arc<AppState>>,
                      body: Result<Json<ChildInput>, JsonRejection>| {
                    http::create_child(state, kind, body)
                },
            ),
        )
        .route(
            &format!("{base}/{{id}}"),
            put(
                move |state: State<Arc<AppState>>,
                      path: Result<Path<i64>, PathRejection>,
                      body: Result<Json<ChildInput>, JsonRejection>| {
                    http::update_child(state, kind, path, body)
                },
            )
            .delete(
                move |state: State<Arc<AppState>>, path: Result<Path<i64>, PathRejection>| {
                    http::delete_child(state, kind, path)
                },
            ),
        )
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Homestash server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
