use async_trait::async_trait;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::servicemodel::{PricingType, ServiceListing};

/// Optional filters for the marketplace search endpoint. All filtering runs
/// in SQL so pagination counts stay consistent with page contents.
#[derive(Debug, Default, Clone)]
pub struct ServiceFilters {
    pub search_term: Option<String>,
    pub category_id: Option<Uuid>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub min_rating: Option<f64>,
    pub location: Option<String>,
}

#[async_trait]
pub trait ServiceExt {
    async fn get_services(&self, page: u32, size: u32) -> Result<Vec<ServiceListing>, sqlx::Error>;

    async fn get_service_count(&self) -> Result<i64, sqlx::Error>;

    async fn get_services_by_category(
        &self,
        category_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<ServiceListing>, sqlx::Error>;

    async fn get_service_count_by_category(&self, category_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn search_services(
        &self,
        filters: &ServiceFilters,
        page: u32,
        size: u32,
    ) -> Result<Vec<ServiceListing>, sqlx::Error>;

    async fn search_service_count(&self, filters: &ServiceFilters) -> Result<i64, sqlx::Error>;

    async fn get_featured_services(&self) -> Result<Vec<ServiceListing>, sqlx::Error>;

    async fn get_popular_services(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Vec<ServiceListing>, sqlx::Error>;

    async fn get_services_by_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<ServiceListing>, sqlx::Error>;

    async fn get_service(&self, service_id: Uuid) -> Result<Option<ServiceListing>, sqlx::Error>;

    async fn get_service_by_slug(&self, slug: &str)
        -> Result<Option<ServiceListing>, sqlx::Error>;

    async fn service_slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn save_service(
        &self,
        provider_id: Uuid,
        category_id: Uuid,
        title: String,
        description: String,
        base_price: BigDecimal,
        pricing_type: PricingType,
        price_unit: Option<String>,
        estimated_duration_minutes: Option<i32>,
        service_area: Option<String>,
        is_available: bool,
        slug: String,
    ) -> Result<ServiceListing, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn update_service(
        &self,
        service_id: Uuid,
        category_id: Uuid,
        title: String,
        description: String,
        base_price: BigDecimal,
        pricing_type: PricingType,
        price_unit: Option<String>,
        estimated_duration_minutes: Option<i32>,
        service_area: Option<String>,
        is_available: bool,
    ) -> Result<ServiceListing, sqlx::Error>;

    async fn soft_delete_service(&self, service_id: Uuid) -> Result<(), sqlx::Error>;

    async fn update_service_rating(
        &self,
        service_id: Uuid,
        average_rating: BigDecimal,
        total_reviews: i32,
    ) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl ServiceExt for DBClient {
    async fn get_services(&self, page: u32, size: u32) -> Result<Vec<ServiceListing>, sqlx::Error> {
        let offset = page as i64 * size as i64;

        sqlx::query_as::<_, ServiceListing>(
            r#"
            SELECT
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            FROM services
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_service_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM services WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await
    }

    async fn get_services_by_category(
        &self,
        category_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<ServiceListing>, sqlx::Error> {
        let offset = page as i64 * size as i64;

        sqlx::query_as::<_, ServiceListing>(
            r#"
            SELECT
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            FROM services
            WHERE is_active = TRUE AND category_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(category_id)
        .bind(size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_service_count_by_category(&self, category_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM services WHERE is_active = TRUE AND category_id = $1",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn search_services(
        &self,
        filters: &ServiceFilters,
        page: u32,
        size: u32,
    ) -> Result<Vec<ServiceListing>, sqlx::Error> {
        let pattern = filters.search_term.as_ref().map(|term| format!("%{}%", term));
        let location = filters.location.as_ref().map(|loc| format!("%{}%", loc));
        let offset = page as i64 * size as i64;

        sqlx::query_as::<_, ServiceListing>(
            r#"
            SELECT
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            FROM services
            WHERE is_active = TRUE
              AND ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::numeric IS NULL OR base_price >= $3)
              AND ($4::numeric IS NULL OR base_price <= $4)
              AND ($5::float8 IS NULL OR average_rating >= $5::numeric)
              AND ($6::text IS NULL OR service_area ILIKE $6)
            ORDER BY created_at DESC
            LIMIT $7 OFFSET $8
            "#,
        )
        .bind(pattern)
        .bind(filters.category_id)
        .bind(filters.min_price.clone())
        .bind(filters.max_price.clone())
        .bind(filters.min_rating)
        .bind(location)
        .bind(size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn search_service_count(&self, filters: &ServiceFilters) -> Result<i64, sqlx::Error> {
        let pattern = filters.search_term.as_ref().map(|term| format!("%{}%", term));
        let location = filters.location.as_ref().map(|loc| format!("%{}%", loc));

        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM services
            WHERE is_active = TRUE
              AND ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::numeric IS NULL OR base_price >= $3)
              AND ($4::numeric IS NULL OR base_price <= $4)
              AND ($5::float8 IS NULL OR average_rating >= $5::numeric)
              AND ($6::text IS NULL OR service_area ILIKE $6)
            "#,
        )
        .bind(pattern)
        .bind(filters.category_id)
        .bind(filters.min_price.clone())
        .bind(filters.max_price.clone())
        .bind(filters.min_rating)
        .bind(location)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_featured_services(&self) -> Result<Vec<ServiceListing>, sqlx::Error> {
        sqlx::query_as::<_, ServiceListing>(
            r#"
            SELECT
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            FROM services
            WHERE is_active = TRUE AND is_featured = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn get_popular_services(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Vec<ServiceListing>, sqlx::Error> {
        let offset = page as i64 * size as i64;

        sqlx::query_as::<_, ServiceListing>(
            r#"
            SELECT
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            FROM services
            WHERE is_active = TRUE
            ORDER BY average_rating DESC, total_reviews DESC, created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_services_by_provider(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<ServiceListing>, sqlx::Error> {
        sqlx::query_as::<_, ServiceListing>(
            r#"
            SELECT
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            FROM services
            WHERE is_active = TRUE AND provider_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_service(&self, service_id: Uuid) -> Result<Option<ServiceListing>, sqlx::Error> {
        sqlx::query_as::<_, ServiceListing>(
            r#"
            SELECT
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            FROM services
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_service_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ServiceListing>, sqlx::Error> {
        sqlx::query_as::<_, ServiceListing>(
            r#"
            SELECT
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            FROM services
            WHERE slug = $1 AND is_active = TRUE
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
    }

    async fn service_slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM services WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
    }

    async fn save_service(
        &self,
        provider_id: Uuid,
        category_id: Uuid,
        title: String,
        description: String,
        base_price: BigDecimal,
        pricing_type: PricingType,
        price_unit: Option<String>,
        estimated_duration_minutes: Option<i32>,
        service_area: Option<String>,
        is_available: bool,
        slug: String,
    ) -> Result<ServiceListing, sqlx::Error> {
        sqlx::query_as::<_, ServiceListing>(
            r#"
            INSERT INTO services (
                provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes,
                service_area, is_available, slug
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            "#,
        )
        .bind(provider_id)
        .bind(category_id)
        .bind(title)
        .bind(description)
        .bind(base_price)
        .bind(pricing_type)
        .bind(price_unit)
        .bind(estimated_duration_minutes)
        .bind(service_area)
        .bind(is_available)
        .bind(slug)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_service(
        &self,
        service_id: Uuid,
        category_id: Uuid,
        title: String,
        description: String,
        base_price: BigDecimal,
        pricing_type: PricingType,
        price_unit: Option<String>,
        estimated_duration_minutes: Option<i32>,
        service_area: Option<String>,
        is_available: bool,
    ) -> Result<ServiceListing, sqlx::Error> {
        sqlx::query_as::<_, ServiceListing>(
            r#"
            UPDATE services
            SET category_id = $2,
                title = $3,
                description = $4,
                base_price = $5,
                pricing_type = $6,
                price_unit = $7,
                estimated_duration_minutes = $8,
                service_area = $9,
                is_available = $10,
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING
                id, provider_id, category_id, title, description, base_price,
                pricing_type, price_unit, estimated_duration_minutes, service_area,
                is_available, is_featured, average_rating, total_reviews, slug,
                is_active, created_at, updated_at
            "#,
        )
        .bind(service_id)
        .bind(category_id)
        .bind(title)
        .bind(description)
        .bind(base_price)
        .bind(pricing_type)
        .bind(price_unit)
        .bind(estimated_duration_minutes)
        .bind(service_area)
        .bind(is_available)
        .fetch_one(&self.pool)
        .await
    }

    async fn soft_delete_service(&self, service_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE services
            SET is_active = FALSE,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(service_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_service_rating(
        &self,
        service_id: Uuid,
        average_rating: BigDecimal,
        total_reviews: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE services
            SET average_rating = $2,
                total_reviews = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(service_id)
        .bind(average_rating)
        .bind(total_reviews)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
