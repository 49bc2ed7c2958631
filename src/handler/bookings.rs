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
    db::bookingdb::BookingExt,
    dtos::{
        bookingdtos::{CancelBookingDto, CreateBookingDto, CreatePaymentDto, RejectBookingDto},
        ApiResponse, PageDto, RequestQueryDto,
    },
    error::HttpError,
    middleware::AuthUser,
    AppState,
};

pub fn bookings_handler() -> Router {
    Router::new()
        .route("/", post(create_booking))
        .route("/customer", get(get_customer_bookings))
        .route("/provider", get(get_provider_bookings))
        .route("/:booking_id", get(get_booking))
        .route("/:booking_id/accept", put(accept_booking))
        .route("/:booking_id/reject", put(reject_booking))
        .route("/:booking_id/start", put(start_booking))
        .route("/:booking_id/complete", put(complete_booking))
        .route("/:booking_id/cancel", put(cancel_booking))
        .route("/:booking_id/payment", post(record_payment).get(get_payment))
}

pub async fn create_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .create_booking(auth.user.id, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            "Booking created successfully",
            booking,
        )),
    ))
}

pub async fn get_customer_bookings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let bookings = app_state
        .db_client
        .get_customer_bookings(auth.user.id, query.page(), query.size())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_customer_booking_count(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Bookings retrieved successfully",
        PageDto::new(bookings, query.page(), query.size(), total),
    )))
}

pub async fn get_provider_bookings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let bookings = app_state
        .db_client
        .get_provider_bookings(auth.user.id, query.page(), query.size())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_provider_booking_count(auth.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Bookings retrieved successfully",
        PageDto::new(bookings, query.page(), query.size(), total),
    )))
}

pub async fn get_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .booking_service
        .get_booking_for_user(booking_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Booking retrieved successfully",
        booking,
    )))
}

pub async fn accept_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .booking_service
        .accept_booking(booking_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Booking accepted successfully",
        booking,
    )))
}

pub async fn reject_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<RejectBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let booking = app_state
        .booking_service
        .reject_booking(booking_id, auth.user.id, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Booking rejected successfully",
        booking,
    )))
}

pub async fn start_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .booking_service
        .start_booking(booking_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Booking started successfully",
        booking,
    )))
}

pub async fn complete_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .booking_service
        .complete_booking(booking_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Booking completed successfully",
        booking,
    )))
}

pub async fn cancel_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<CancelBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let is_admin = auth.is_admin();
    let booking = app_state
        .booking_service
        .cancel_booking(booking_id, auth.user.id, is_admin, body)
        .await?;

    Ok(Json(ApiResponse::success(
        "Booking cancelled successfully",
        booking,
    )))
}

pub async fn record_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<CreatePaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let payment = app_state
        .booking_service
        .record_payment(booking_id, auth.user.id, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            "Payment recorded successfully",
            payment,
        )),
    ))
}

pub async fn get_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let payment = app_state
        .booking_service
        .get_payment_for_user(booking_id, auth.user.id)
        .await?;

    Ok(Json(ApiResponse::success(
        "Payment retrieved successfully",
        payment,
    )))
}
