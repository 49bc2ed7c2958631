use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::{
        userdtos::{
            AvailabilityDto, ChangePasswordDto, CheckEmailQueryDto, CheckPhoneQueryDto,
            FilterUserDto, NearbyUsersQueryDto, ToggleStatusQueryDto, UpdateUserProfileDto,
            UserSearchQueryDto,
        },
        ApiResponse, PageDto, RequestQueryDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::AuthUser,
    models::usermodel::{RoleName, User},
    utils::password,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/", get(get_all_users))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/change-password", put(change_password))
        .route("/check-email", get(check_email))
        .route("/check-phone", get(check_phone))
        .route("/search", get(search_users))
        .route("/stats", get(get_user_stats))
        .route("/providers", get(get_providers))
        .route("/customers", get(get_customers))
        .route("/nearby", get(get_nearby_users))
        .route("/role/:role_name", get(get_users_by_role))
        .route("/:user_id", get(get_user_by_id).delete(delete_user))
        .route("/:user_id/verify-email", put(verify_email))
        .route("/:user_id/verify-phone", put(verify_phone))
        .route("/:user_id/toggle-status", put(toggle_status))
}

pub async fn get_profile(
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let user = FilterUserDto::filter_user(&auth.user, &auth.roles);

    Ok(Json(ApiResponse::success(
        "Profile retrieved successfully",
        user,
    )))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateUserProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // A phone number already registered to someone else is a conflict.
    if let Some(ref phone_number) = body.phone_number {
        if auth.user.phone_number.as_deref() != Some(phone_number.as_str()) {
            let phone_taken = app_state
                .db_client
                .phone_exists(phone_number)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?;

            if phone_taken {
                return Err(HttpError::conflict(ErrorMessage::PhoneExist.to_string()));
            }
        }
    }

    let updated = app_state
        .db_client
        .update_user_profile(
            auth.user.id,
            body.first_name,
            body.last_name,
            body.phone_number,
            body.address,
            body.city,
            body.state,
            body.postal_code,
            body.country,
            body.latitude,
            body.longitude,
            body.profile_image_url,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Profile updated successfully",
        FilterUserDto::filter_user(&updated, &auth.roles),
    )))
}

pub async fn change_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ChangePasswordDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if body.new_password == body.current_password {
        return Err(HttpError::bad_request(
            "New password must be different from current password",
        ));
    }

    let password_matched = password::compare(&body.current_password, &auth.user.password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request("Current password is incorrect"));
    }

    let hashed_password =
        password::hash(&body.new_password).map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .update_user_password(auth.user.id, hashed_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("password changed for user {}", auth.user.id);

    Ok(Json(ApiResponse::message("Password changed successfully")))
}

pub async fn check_email(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<CheckEmailQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let taken = app_state
        .db_client
        .email_exists(&query.email)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Email availability checked",
        AvailabilityDto { available: !taken },
    )))
}

pub async fn check_phone(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<CheckPhoneQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let taken = app_state
        .db_client
        .phone_exists(&query.phone_number)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Phone availability checked",
        AvailabilityDto { available: !taken },
    )))
}

pub async fn get_all_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let users = app_state
        .db_client
        .get_users(query.page(), query.size())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .get_user_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let content = filter_users_with_roles(&app_state, users).await?;
    let page = PageDto::new(content, query.page(), query.size(), total);

    Ok(Json(ApiResponse::success(
        "Users retrieved successfully",
        page,
    )))
}

pub async fn search_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<UserSearchQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(0);
    let size = query.size.unwrap_or(10);

    let users = app_state
        .db_client
        .search_users(&query.q, page, size)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total = app_state
        .db_client
        .search_user_count(&query.q)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let content = filter_users_with_roles(&app_state, users).await?;

    Ok(Json(ApiResponse::success(
        "Users retrieved successfully",
        PageDto::new(content, page, size, total),
    )))
}

pub async fn get_user_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state
        .db_client
        .get_user_stats()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "User statistics retrieved successfully",
        stats,
    )))
}

pub async fn get_providers(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let providers = app_state
        .db_client
        .get_users_by_role(RoleName::Provider)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let content = filter_users_with_roles(&app_state, providers).await?;

    Ok(Json(ApiResponse::success(
        "Providers retrieved successfully",
        content,
    )))
}

pub async fn get_customers(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let customers = app_state
        .db_client
        .get_users_by_role(RoleName::Customer)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let content = filter_users_with_roles(&app_state, customers).await?;

    Ok(Json(ApiResponse::success(
        "Customers retrieved successfully",
        content,
    )))
}

pub async fn get_nearby_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<NearbyUsersQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let users = app_state
        .db_client
        .get_users_within_radius(query.latitude, query.longitude, query.radius_km)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let content = filter_users_with_roles(&app_state, users).await?;

    Ok(Json(ApiResponse::success(
        "Nearby users retrieved successfully",
        content,
    )))
}

pub async fn get_users_by_role(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(role_name): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let role = RoleName::parse(&role_name)
        .ok_or_else(|| HttpError::bad_request(format!("Unknown role: {}", role_name)))?;

    let users = app_state
        .db_client
        .get_users_by_role(role)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let content = filter_users_with_roles(&app_state, users).await?;

    Ok(Json(ApiResponse::success(
        "Users retrieved successfully",
        content,
    )))
}

pub async fn get_user_by_id(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = find_user(&app_state, user_id).await?;

    let roles = app_state
        .db_client
        .get_user_roles(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        FilterUserDto::filter_user(&user, &roles),
    )))
}

pub async fn delete_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    find_user(&app_state, user_id).await?;

    app_state
        .db_client
        .soft_delete_user(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("user {} soft-deleted", user_id);

    Ok(Json(ApiResponse::message("User deleted successfully")))
}

pub async fn verify_email(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    find_user(&app_state, user_id).await?;

    app_state
        .db_client
        .set_email_verified(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::message("Email verified successfully")))
}

pub async fn verify_phone(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    find_user(&app_state, user_id).await?;

    app_state
        .db_client
        .set_phone_verified(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::message("Phone verified successfully")))
}

pub async fn toggle_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ToggleStatusQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    find_user(&app_state, user_id).await?;

    app_state
        .db_client
        .set_user_enabled(user_id, query.enabled)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let message = if query.enabled {
        "User account enabled"
    } else {
        "User account disabled"
    };

    Ok(Json(ApiResponse::message(message)))
}

async fn find_user(app_state: &AppState, user_id: Uuid) -> Result<User, HttpError> {
    app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("User not found with id: {}", user_id)))
}

async fn filter_users_with_roles(
    app_state: &AppState,
    users: Vec<User>,
) -> Result<Vec<FilterUserDto>, HttpError> {
    let mut content = Vec::with_capacity(users.len());

    for user in &users {
        let roles = app_state
            .db_client
            .get_user_roles(user.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        content.push(FilterUserDto::filter_user(user, &roles));
    }

    Ok(content)
}
