use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::categorymodel::Category;

#[async_trait]
pub trait CategoryExt {
    async fn get_categories(&self) -> Result<Vec<Category>, sqlx::Error>;

    async fn get_top_level_categories(&self) -> Result<Vec<Category>, sqlx::Error>;

    async fn get_subcategories(&self, parent_id: Uuid) -> Result<Vec<Category>, sqlx::Error>;

    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>, sqlx::Error>;

    async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>, sqlx::Error>;

    async fn category_slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn save_category(
        &self,
        name: String,
        description: Option<String>,
        icon_url: Option<String>,
        image_url: Option<String>,
        slug: String,
        sort_order: i32,
        is_featured: bool,
        parent_category_id: Option<Uuid>,
    ) -> Result<Category, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn update_category(
        &self,
        category_id: Uuid,
        name: Option<String>,
        description: Option<String>,
        icon_url: Option<String>,
        image_url: Option<String>,
        sort_order: Option<i32>,
        is_featured: Option<bool>,
        parent_category_id: Option<Uuid>,
    ) -> Result<Category, sqlx::Error>;

    async fn soft_delete_category(&self, category_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl CategoryExt for DBClient {
    async fn get_categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT
                id, name, description, icon_url, image_url, slug, sort_order,
                is_featured, parent_category_id, is_active, created_at, updated_at
            FROM categories
            WHERE is_active = TRUE
            ORDER BY sort_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_top_level_categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT
                id, name, description, icon_url, image_url, slug, sort_order,
                is_featured, parent_category_id, is_active, created_at, updated_at
            FROM categories
            WHERE is_active = TRUE AND parent_category_id IS NULL
            ORDER BY sort_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_subcategories(&self, parent_id: Uuid) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT
                id, name, description, icon_url, image_url, slug, sort_order,
                is_featured, parent_category_id, is_active, created_at, updated_at
            FROM categories
            WHERE is_active = TRUE AND parent_category_id = $1
            ORDER BY sort_order, name
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_category(&self, category_id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT
                id, name, description, icon_url, image_url, slug, sort_order,
                is_featured, parent_category_id, is_active, created_at, updated_at
            FROM categories
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT
                id, name, description, icon_url, image_url, slug, sort_order,
                is_featured, parent_category_id, is_active, created_at, updated_at
            FROM categories
            WHERE slug = $1 AND is_active = TRUE
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
    }

    async fn category_slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
    }

    async fn save_category(
        &self,
        name: String,
        description: Option<String>,
        icon_url: Option<String>,
        image_url: Option<String>,
        slug: String,
        sort_order: i32,
        is_featured: bool,
        parent_category_id: Option<Uuid>,
    ) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (
                name, description, icon_url, image_url, slug,
                sort_order, is_featured, parent_category_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id, name, description, icon_url, image_url, slug, sort_order,
                is_featured, parent_category_id, is_active, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(icon_url)
        .bind(image_url)
        .bind(slug)
        .bind(sort_order)
        .bind(is_featured)
        .bind(parent_category_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_category(
        &self,
        category_id: Uuid,
        name: Option<String>,
        description: Option<String>,
        icon_url: Option<String>,
        image_url: Option<String>,
        sort_order: Option<i32>,
        is_featured: Option<bool>,
        parent_category_id: Option<Uuid>,
    ) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                icon_url = COALESCE($4, icon_url),
                image_url = COALESCE($5, image_url),
                sort_order = COALESCE($6, sort_order),
                is_featured = COALESCE($7, is_featured),
                parent_category_id = COALESCE($8, parent_category_id),
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING
                id, name, description, icon_url, image_url, slug, sort_order,
                is_featured, parent_category_id, is_active, created_at, updated_at
            "#,
        )
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(icon_url)
        .bind(image_url)
        .bind(sort_order)
        .bind(is_featured)
        .bind(parent_category_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn soft_delete_category(&self, category_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE categories
            SET is_active = FALSE,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(category_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
