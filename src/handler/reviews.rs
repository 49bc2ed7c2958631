use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::reviewdb::ReviewExt,
    dtos::{
        reviewdtos::{CreateReviewDto, ProviderResponseDto},
        ApiResponse, PageDto, RequestQueryDto,
    },
    error::HttpError,
    middleware::AuthUser,
    AppState,
};

pub fn reviews_handler() -> Router {
    Router::new()
        .route("/", post(create_review))
        .route("/customer", get(get_customer_reviews))
        .route("/service/:service_id", get(get_service_reviews))
        .route("/provider/:provider_id", get(get_provider_reviews))
        .route("/:review_id", get(get_review))
        .route("/:review_id/response", put(respond_to_review))
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let review = app_state
        .review_service
        .create_review(auth.user.id, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("Review created successfully", review)),
    ))
}

pub async fn get_service_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(service_id): Path<Uuid>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let reviews = app_state
        .db_client
        .get_service_reviews(service_id, query.page(), query.size())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_service_review_count(service_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Reviews retrieved successfully",
        PageDto::new(reviews, query.page(), query.size(), total),
    )))
}

pub async fn get_provider_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(provider_id): Path<Uuid>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let reviews = app_state
        .db_client
        .get_provider_reviews(provider_id, query.page(), query.size())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_provider_review_count(provider_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Reviews retrieved successfully",
        PageDto::new(reviews, query.page(), query.size(), total),
    )))
}

pub async fn get_customer_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let reviews = app_state
        .db_client
        .get_customer_reviews(auth.user.id, query.page(), query.size())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_customer_review_count(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Reviews retrieved successfully",
        PageDto::new(reviews, query.page(), query.size(), total),
    )))
}

pub async fn get_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let review = app_state
        .db_client
        .get_review(review_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Review not found with id: {}", review_id)))?;

    Ok(Json(ApiResponse::success(
        "Review retrieved successfully",
        review,
    )))
}

pub async fn respond_to_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(review_id): Path<Uuid>,
    Json(body): Json<ProviderResponseDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let review = app_state
        .review_service
        .respond_to_review(review_id, auth.user.id, body.response)
        .await?;

    Ok(Json(ApiResponse::success(
        "Response added successfully",
        review,
    )))
}
