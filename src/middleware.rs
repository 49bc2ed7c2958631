use std::sync::Arc;

use axum::{
    body::Body,
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};

use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

use crate::{
    db::userdb::UserExt,
    error::{ErrorMessage, HttpError},
    models::usermodel::{RoleName, User},
    policy::{self, RouteAccess},
    utils::token,
    AppState,
};

/// Transient authenticated principal for one request: the persisted user row
/// joined with its resolved authorities at authentication time.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub roles: Vec<RoleName>,
}

impl AuthUser {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(RoleName::Admin)
    }
}

/// Single-pass bearer-token authentication. Anything that goes wrong —
/// missing header, bad signature, expiry, unknown or disabled user — lets the
/// request continue unauthenticated for the authorization layer to judge.
/// The one exception: presenting a refresh token as a credential is rejected
/// outright with 401.
pub async fn authenticate(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|token| token.to_owned())
                })
        });

    let Some(token) = token else {
        return Ok(next.run(req).await);
    };

    let claims = match token::decode_token(token, app_state.env.jwt_secret.as_bytes()) {
        Ok(claims) => claims,
        Err(_) => return Ok(next.run(req).await),
    };

    if claims.is_refresh() {
        tracing::warn!("refresh token used for authentication: {}", claims.sub);
        return Err(HttpError::unauthorized(
            ErrorMessage::RefreshTokenNotAllowed.to_string(),
        ));
    }

    let user = match app_state.db_client.get_user(None, Some(&claims.sub)).await {
        Ok(Some(user)) if user.enabled => user,
        _ => return Ok(next.run(req).await),
    };

    let roles = match app_state.db_client.get_user_roles(user.id).await {
        Ok(roles) => roles,
        Err(_) => return Ok(next.run(req).await),
    };

    req.extensions_mut().insert(AuthUser { user, roles });

    Ok(next.run(req).await)
}

/// Central role-based authorization keyed on the static policy table,
/// evaluated after authentication and before the handler.
pub async fn authorize(req: Request, next: Next) -> Result<Response, HttpError> {
    let access = policy::route_access(req.method(), req.uri().path());
    let auth = req.extensions().get::<AuthUser>();

    match access {
        RouteAccess::Public => {}
        RouteAccess::Authenticated => {
            if auth.is_none() {
                return Err(HttpError::unauthorized(
                    ErrorMessage::UserNotAuthenticated.to_string(),
                ));
            }
        }
        RouteAccess::AnyOf(required_roles) => {
            let auth = auth.ok_or_else(|| {
                HttpError::unauthorized(ErrorMessage::UserNotAuthenticated.to_string())
            })?;

            if !required_roles.iter().any(|role| auth.has_role(*role)) {
                return Err(HttpError::forbidden(
                    ErrorMessage::PermissionDenied.to_string(),
                ));
            }
        }
    }

    Ok(next.run(req).await)
}

/// Fills the `path` field of the JSON envelope once the request URI is known.
/// Non-JSON responses and bodies that fail to parse pass through untouched.
pub async fn stamp_response_path(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    if !is_json {
        return response;
    }

    let (mut parts, body) = response.into_parts();

    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return HttpError::server_error("Failed to buffer response body".to_string())
                .into_http_response()
        }
    };

    if let Ok(mut value) = serde_json::from_slice::<Value>(&bytes) {
        if let Some(object) = value.as_object_mut() {
            let path_missing = object
                .get("path")
                .map(|current| current.is_null())
                .unwrap_or(false);

            if path_missing {
                object.insert("path".to_string(), Value::String(path));
                parts.headers.remove(header::CONTENT_LENGTH);
                let body = serde_json::to_vec(&value).unwrap_or_else(|_| bytes.to_vec());
                return Response::from_parts(parts, Body::from(body));
            }
        }
    }

    Response::from_parts(parts, Body::from(bytes))
}
