use async_trait::async_trait;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::reviewmodel::Review;

const REVIEW_COLUMNS: &str = r#"
    id, booking_id, customer_id, service_id, provider_id,
    overall_rating, quality_rating, communication_rating,
    punctuality_rating, value_rating, title, comment,
    provider_response, provider_response_at,
    is_active, created_at, updated_at
"#;

#[async_trait]
pub trait ReviewExt {
    #[allow(clippy::too_many_arguments)]
    async fn create_review(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        service_id: Uuid,
        provider_id: Uuid,
        overall_rating: BigDecimal,
        quality_rating: Option<BigDecimal>,
        communication_rating: Option<BigDecimal>,
        punctuality_rating: Option<BigDecimal>,
        value_rating: Option<BigDecimal>,
        title: Option<String>,
        comment: String,
    ) -> Result<Review, sqlx::Error>;

    async fn get_review(&self, review_id: Uuid) -> Result<Option<Review>, sqlx::Error>;

    async fn review_exists_for_booking(&self, booking_id: Uuid) -> Result<bool, sqlx::Error>;

    async fn get_service_reviews(
        &self,
        service_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Review>, sqlx::Error>;

    async fn get_service_review_count(&self, service_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn get_provider_reviews(
        &self,
        provider_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Review>, sqlx::Error>;

    async fn get_provider_review_count(&self, provider_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn get_customer_reviews(
        &self,
        customer_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Review>, sqlx::Error>;

    async fn get_customer_review_count(&self, customer_id: Uuid) -> Result<i64, sqlx::Error>;

    /// Mean of overall ratings plus the row count for one service.
    async fn get_service_rating(
        &self,
        service_id: Uuid,
    ) -> Result<(Option<BigDecimal>, i64), sqlx::Error>;

    async fn set_provider_response(
        &self,
        review_id: Uuid,
        response: String,
    ) -> Result<Review, sqlx::Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        service_id: Uuid,
        provider_id: Uuid,
        overall_rating: BigDecimal,
        quality_rating: Option<BigDecimal>,
        communication_rating: Option<BigDecimal>,
        punctuality_rating: Option<BigDecimal>,
        value_rating: Option<BigDecimal>,
        title: Option<String>,
        comment: String,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO reviews (
                booking_id, customer_id, service_id, provider_id,
                overall_rating, quality_rating, communication_rating,
                punctuality_rating, value_rating, title, comment
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {REVIEW_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(booking_id)
            .bind(customer_id)
            .bind(service_id)
            .bind(provider_id)
            .bind(overall_rating)
            .bind(quality_rating)
            .bind(communication_rating)
            .bind(punctuality_rating)
            .bind(value_rating)
            .bind(title)
            .bind(comment)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_review(&self, review_id: Uuid) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE id = $1 AND is_active = TRUE
            "#
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn review_exists_for_booking(&self, booking_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE booking_id = $1 AND is_active = TRUE)",
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_service_reviews(
        &self,
        service_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let offset = page as i64 * size as i64;
        let query = format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE service_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(service_id)
            .bind(size as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_service_review_count(&self, service_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews WHERE service_id = $1 AND is_active = TRUE",
        )
        .bind(service_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_provider_reviews(
        &self,
        provider_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let offset = page as i64 * size as i64;
        let query = format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE provider_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(provider_id)
            .bind(size as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_provider_review_count(&self, provider_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews WHERE provider_id = $1 AND is_active = TRUE",
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_customer_reviews(
        &self,
        customer_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let offset = page as i64 * size as i64;
        let query = format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM reviews
            WHERE customer_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(customer_id)
            .bind(size as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_customer_review_count(&self, customer_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM reviews WHERE customer_id = $1 AND is_active = TRUE",
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_service_rating(
        &self,
        service_id: Uuid,
    ) -> Result<(Option<BigDecimal>, i64), sqlx::Error> {
        sqlx::query_as::<_, (Option<BigDecimal>, i64)>(
            r#"
            SELECT AVG(overall_rating), COUNT(*)
            FROM reviews
            WHERE service_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(service_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_provider_response(
        &self,
        review_id: Uuid,
        response: String,
    ) -> Result<Review, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE reviews
            SET provider_response = $2,
                provider_response_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING {REVIEW_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(review_id)
            .bind(response)
            .fetch_one(&self.pool)
            .await
    }
}
