use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        categorydb::CategoryExt,
        servicedb::{ServiceExt, ServiceFilters},
    },
    dtos::{
        servicedtos::{CreateServiceDto, SearchServicesQueryDto},
        ApiResponse, PageDto, RequestQueryDto,
    },
    error::HttpError,
    middleware::AuthUser,
    models::servicemodel::ServiceListing,
    utils::slug::slugify,
    AppState,
};

pub fn services_handler() -> Router {
    Router::new()
        .route("/", get(get_all_services).post(create_service))
        .route("/featured", get(get_featured_services))
        .route("/search", get(search_services))
        .route("/slug/:slug", get(get_service_by_slug))
        .route("/category/:category_id", get(get_services_by_category))
        .route("/provider/:provider_id", get(get_services_by_provider))
        .route(
            "/:service_id",
            get(get_service_by_id)
                .put(update_service)
                .delete(delete_service),
        )
}

pub async fn get_all_services(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let services = app_state
        .db_client
        .get_services(query.page(), query.size())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_service_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Services retrieved successfully",
        PageDto::new(services, query.page(), query.size(), total),
    )))
}

pub async fn get_services_by_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let services = app_state
        .db_client
        .get_services_by_category(category_id, query.page(), query.size())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_service_count_by_category(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Services retrieved successfully",
        PageDto::new(services, query.page(), query.size(), total),
    )))
}

pub async fn search_services(
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
        "Services retrieved successfully",
        PageDto::new(services, page, size, total),
    )))
}

pub async fn get_featured_services(
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

pub async fn get_services_by_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let services = app_state
        .db_client
        .get_services_by_provider(provider_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Services retrieved successfully",
        services,
    )))
}

pub async fn get_service_by_id(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(service_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let service = find_service(&app_state, service_id).await?;

    Ok(Json(ApiResponse::success(
        "Service retrieved successfully",
        service,
    )))
}

pub async fn get_service_by_slug(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let service = app_state
        .db_client
        .get_service_by_slug(&slug)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Service not found with slug: {}", slug)))?;

    Ok(Json(ApiResponse::success(
        "Service retrieved successfully",
        service,
    )))
}

pub async fn create_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateServiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .db_client
        .get_category(body.category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::not_found(format!("Category not found with id: {}", body.category_id))
        })?;

    let slug = unique_slug(&app_state, &body.title).await?;

    let service = app_state
        .db_client
        .save_service(
            auth.user.id,
            body.category_id,
            body.title,
            body.description,
            body.base_price,
            body.pricing_type,
            body.price_unit,
            body.estimated_duration_minutes,
            body.service_area,
            body.is_available.unwrap_or(true),
            slug,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!(
        "service {} created by provider {}",
        service.id,
        auth.user.id
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            "Service created successfully",
            service,
        )),
    ))
}

pub async fn update_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(service_id): Path<Uuid>,
    Json(body): Json<CreateServiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let service = find_service(&app_state, service_id).await?;

    if service.provider_id != auth.user.id {
        return Err(HttpError::bad_request(
            "You can only update your own services",
        ));
    }

    app_state
        .db_client
        .get_category(body.category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::not_found(format!("Category not found with id: {}", body.category_id))
        })?;

    let updated = app_state
        .db_client
        .update_service(
            service_id,
            body.category_id,
            body.title,
            body.description,
            body.base_price,
            body.pricing_type,
            body.price_unit,
            body.estimated_duration_minutes,
            body.service_area,
            body.is_available.unwrap_or(service.is_available),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Service updated successfully",
        updated,
    )))
}

pub async fn delete_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(service_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let service = find_service(&app_state, service_id).await?;

    if service.provider_id != auth.user.id {
        return Err(HttpError::bad_request(
            "You can only delete your own services",
        ));
    }

    app_state
        .db_client
        .soft_delete_service(service_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::message("Service deleted successfully")))
}

async fn find_service(
    app_state: &AppState,
    service_id: Uuid,
) -> Result<ServiceListing, HttpError> {
    app_state
        .db_client
        .get_service(service_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Service not found with id: {}", service_id)))
}

/// Slugs are unique across listings; a clashing title gets a short random
/// suffix instead of failing the insert.
async fn unique_slug(app_state: &AppState, title: &str) -> Result<String, HttpError> {
    let base = slugify(title);

    if base.is_empty() {
        return Err(HttpError::bad_request(
            "Title must contain at least one alphanumeric character",
        ));
    }

    let taken = app_state
        .db_client
        .service_slug_exists(&base)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !taken {
        return Ok(base);
    }

    let suffix = Uuid::new_v4().to_string();
    Ok(format!("{}-{}", base, &suffix[..8]))
}
