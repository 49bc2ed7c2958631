use std::sync::Arc;

use axum::{
    extract::Query, response::IntoResponse, routing::get, Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::servicedb::{ServiceExt, ServiceFilters},
    dtos::{servicedtos::SearchServicesQueryDto, ApiResponse, PageDto, RequestQueryDto},
    error::HttpError,
    AppState,
};

pub fn search_handler() -> Router {
    Router::new()
        .route("/", get(search))
        .route("/featured", get(featured))
        .route("/popular", get(popular))
}

/// Marketplace search across listings; every filter is applied in SQL.
pub async fn search(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<SearchServicesQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(0);
    let size = query.size.unwrap_or(10);

    let filters = ServiceFilters {
        search_term: query.q,
        category_id: query.category_id,
        min_price: query.min_price,
        max_price: query.max_price,
        min_rating: query.min_rating,
        location: query.location,
    };

    let services = app_state
        .db_client
        .search_services(&filters, page, size)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .search_service_count(&filters)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Search completed successfully",
        PageDto::new(services, page, size, total),
    )))
}

pub async fn featured(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let services = app_state
        .db_client
        .get_featured_services()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Featured services retrieved successfully",
        services,
    )))
}

pub async fn popular(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let services = app_state
        .db_client
        .get_popular_services(query.page(), query.size())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_service_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Popular services retrieved successfully",
        PageDto::new(services, query.page(), query.size(), total),
    )))
}
