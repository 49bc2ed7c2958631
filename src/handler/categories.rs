use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::categorydb::CategoryExt,
    dtos::{
        categorydtos::{CreateCategoryDto, UpdateCategoryDto},
        ApiResponse,
    },
    error::HttpError,
    models::categorymodel::Category,
    utils::slug::slugify,
    AppState,
};

pub fn categories_handler() -> Router {
    Router::new()
        .route("/", get(get_all_categories).post(create_category))
        .route("/top-level", get(get_top_level_categories))
        .route("/slug/:slug", get(get_category_by_slug))
        .route(
            "/:category_id",
            get(get_category_by_id)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/:category_id/subcategories", get(get_subcategories))
}

pub async fn get_all_categories(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let categories = app_state
        .db_client
        .get_categories()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Categories retrieved successfully",
        categories,
    )))
}

pub async fn get_top_level_categories(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let categories = app_state
        .db_client
        .get_top_level_categories()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Top-level categories retrieved successfully",
        categories,
    )))
}

pub async fn get_subcategories(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    find_category(&app_state, category_id).await?;

    let subcategories = app_state
        .db_client
        .get_subcategories(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Subcategories retrieved successfully",
        subcategories,
    )))
}

pub async fn get_category_by_id(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let category = find_category(&app_state, category_id).await?;

    Ok(Json(ApiResponse::success(
        "Category retrieved successfully",
        category,
    )))
}

pub async fn get_category_by_slug(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let category = app_state
        .db_client
        .get_category_by_slug(&slug)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Category not found with slug: {}", slug)))?;

    Ok(Json(ApiResponse::success(
        "Category retrieved successfully",
        category,
    )))
}

pub async fn create_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateCategoryDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let slug = match body.slug {
        Some(slug) => slug,
        None => slugify(&body.name),
    };

    if slug.is_empty() {
        return Err(HttpError::bad_request(
            "Category name must contain at least one alphanumeric character",
        ));
    }

    let slug_taken = app_state
        .db_client
        .category_slug_exists(&slug)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if slug_taken {
        return Err(HttpError::conflict(format!(
            "Category slug already exists: {}",
            slug
        )));
    }

    if let Some(parent_id) = body.parent_category_id {
        find_category(&app_state, parent_id).await?;
    }

    let category = app_state
        .db_client
        .save_category(
            body.name,
            body.description,
            body.icon_url,
            body.image_url,
            slug,
            body.sort_order.unwrap_or(0),
            body.is_featured.unwrap_or(false),
            body.parent_category_id,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            "Category created successfully",
            category,
        )),
    ))
}

pub async fn update_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
    Json(body): Json<UpdateCategoryDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    find_category(&app_state, category_id).await?;

    if let Some(parent_id) = body.parent_category_id {
        ensure_no_cycle(&app_state, category_id, parent_id).await?;
    }

    let category = app_state
        .db_client
        .update_category(
            category_id,
            body.name,
            body.description,
            body.icon_url,
            body.image_url,
            body.sort_order,
            body.is_featured,
            body.parent_category_id,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        "Category updated successfully",
        category,
    )))
}

pub async fn delete_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    find_category(&app_state, category_id).await?;

    app_state
        .db_client
        .soft_delete_category(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApiResponse::message("Category deleted successfully")))
}

async fn find_category(app_state: &AppState, category_id: Uuid) -> Result<Category, HttpError> {
    app_state
        .db_client
        .get_category(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::not_found(format!("Category not found with id: {}", category_id))
        })
}

/// Walks the parent chain from the proposed parent upward; reparenting must
/// never make a category its own ancestor.
async fn ensure_no_cycle(
    app_state: &AppState,
    category_id: Uuid,
    new_parent_id: Uuid,
) -> Result<(), HttpError> {
    const MAX_DEPTH: usize = 32;

    let mut current = Some(new_parent_id);
    let mut depth = 0;

    while let Some(ancestor_id) = current {
        if ancestor_id == category_id {
            return Err(HttpError::bad_request(
                "Category cannot be its own ancestor",
            ));
        }

        depth += 1;
        if depth > MAX_DEPTH {
            break;
        }

        current = find_category(app_state, ancestor_id).await?.parent_category_id;
    }

    Ok(())
}
