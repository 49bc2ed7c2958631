use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(length(
        min = 2,
        max = 100,
        message = "Category name must be between 2 and 100 characters"
    ))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Icon URL must be a valid URL"))]
    pub icon_url: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    // Derived from the name when absent
    #[validate(length(min = 1, max = 100, message = "Slug must be between 1 and 100 characters"))]
    pub slug: Option<String>,

    pub sort_order: Option<i32>,
    pub is_featured: Option<bool>,
    pub parent_category_id: Option<Uuid>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    #[validate(length(
        min = 2,
        max = 100,
        message = "Category name must be between 2 and 100 characters"
    ))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Icon URL must be a valid URL"))]
    pub icon_url: Option<String>,

    #[validate(url(message = "Image URL must be a valid URL"))]
    pub image_url: Option<String>,

    pub sort_order: Option<i32>,
    pub is_featured: Option<bool>,
    pub parent_category_id: Option<Uuid>,
}
