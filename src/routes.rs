use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler, bookings::bookings_handler, categories::categories_handler,
        reviews::reviews_handler, search::search_handler, services::services_handler,
        users::users_handler,
    },
    middleware::{authenticate, authorize, stamp_response_path},
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler())
        .nest("/categories", categories_handler())
        .nest("/services", services_handler())
        .nest("/bookings", bookings_handler())
        .nest("/reviews", reviews_handler())
        .nest("/search", search_handler());

    // Outermost layer runs first: envelope path stamping, then the app state
    // extension, tracing, authentication and finally the policy check.
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .layer(middleware::from_fn(authorize))
        .layer(middleware::from_fn(authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
        .layer(middleware::from_fn(stamp_response_path))
}
