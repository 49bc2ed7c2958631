use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::{
        userdtos::{AuthResponseDto, FilterUserDto, LoginUserDto, RegisterUserDto},
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    middleware::AuthUser,
    models::usermodel::{RoleName, User},
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/validate", post(validate))
        .route("/logout", post(logout))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let role_name = RoleName::parse(&body.user_type)
        .filter(RoleName::is_self_assignable)
        .ok_or_else(|| HttpError::bad_request("User type must be CUSTOMER or PROVIDER"))?;

    let email_taken = app_state
        .db_client
        .email_exists(&body.email)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if email_taken {
        return Err(HttpError::conflict(ErrorMessage::EmailExist.to_string()));
    }

    if let Some(ref phone_number) = body.phone_number {
        let phone_taken = app_state
            .db_client
            .phone_exists(phone_number)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        if phone_taken {
            return Err(HttpError::conflict(ErrorMessage::PhoneExist.to_string()));
        }
    }

    let role = app_state
        .db_client
        .get_role_by_name(role_name)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::not_found(format!("Role {} not found", role_name.to_str()))
        })?;

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = app_state
        .db_client
        .save_user(
            body.first_name,
            body.last_name,
            body.email,
            hashed_password,
            body.phone_number,
            body.address,
            body.city,
            body.state,
            body.postal_code,
            body.country,
            body.latitude,
            body.longitude,
            role.id,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("user registered: {} ({})", user.email, role_name.to_str());

    let auth_response = issue_tokens(&app_state, &user, &[role_name])?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            "User registered successfully",
            auth_response,
        )),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !user.enabled {
        tracing::warn!("login attempt on disabled account: {}", user.email);
        return Err(HttpError::unauthorized(
            ErrorMessage::AccountDisabled.to_string(),
        ));
    }

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    let roles = app_state
        .db_client
        .get_user_roles(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let auth_response = issue_tokens(&app_state, &user, &roles)?;

    Ok(Json(ApiResponse::success("Login successful", auth_response)))
}

/// Exchanges a refresh token (Authorization: Bearer <refresh>) for a fresh
/// access token. The refresh token itself is returned unchanged.
pub async fn refresh(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    let refresh_token = bearer_token(&headers)
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let claims = token::decode_token(refresh_token.clone(), app_state.env.jwt_secret.as_bytes())?;

    if !claims.is_refresh() {
        return Err(HttpError::unauthorized("Refresh token required"));
    }

    let user = app_state
        .db_client
        .get_user(None, Some(&claims.sub))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    if !user.enabled {
        return Err(HttpError::unauthorized(
            ErrorMessage::AccountDisabled.to_string(),
        ));
    }

    let roles = app_state
        .db_client
        .get_user_roles(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let access_token = token::create_access_token(
        &user.email,
        &roles,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_access_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let auth_response = AuthResponseDto::bearer(
        access_token,
        refresh_token,
        app_state.env.jwt_access_maxage,
        FilterUserDto::filter_user(&user, &roles),
    );

    Ok(Json(ApiResponse::success(
        "Token refreshed successfully",
        auth_response,
    )))
}

pub async fn validate(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    let access_token = bearer_token(&headers)
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let claims = token::decode_token(access_token, app_state.env.jwt_secret.as_bytes())?;

    if !claims.is_access() {
        return Err(HttpError::unauthorized(
            ErrorMessage::RefreshTokenNotAllowed.to_string(),
        ));
    }

    let user = app_state
        .db_client
        .get_user(None, Some(&claims.sub))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    let roles = app_state
        .db_client
        .get_user_roles(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Token is valid",
        FilterUserDto::filter_user(&user, &roles),
    )))
}

/// Tokens are stateless, so logout is a client-side discard; the event is
/// still logged for auditing.
pub async fn logout(auth: Option<Extension<AuthUser>>) -> Result<impl IntoResponse, HttpError> {
    if let Some(Extension(auth)) = auth {
        tracing::info!("user logged out: {}", auth.user.email);
    }

    Ok(Json(ApiResponse::message("Logged out successfully")))
}

fn issue_tokens(
    app_state: &AppState,
    user: &User,
    roles: &[RoleName],
) -> Result<AuthResponseDto, HttpError> {
    let access_token = token::create_access_token(
        &user.email,
        roles,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_access_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let refresh_token = token::create_refresh_token(
        &user.email,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_refresh_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(AuthResponseDto::bearer(
        access_token,
        refresh_token,
        app_state.env.jwt_access_maxage,
        FilterUserDto::filter_user(user, roles),
    ))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(|t| t.to_owned()))
}
