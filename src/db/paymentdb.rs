use async_trait::async_trait;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::paymentmodel::{Payment, PaymentMethod};

#[async_trait]
pub trait PaymentExt {
    #[allow(clippy::too_many_arguments)]
    async fn create_payment(
        &self,
        booking_id: Uuid,
        amount: BigDecimal,
        currency: String,
        payment_method: PaymentMethod,
        processing_fee: BigDecimal,
        platform_fee: BigDecimal,
        provider_amount: BigDecimal,
        description: Option<String>,
    ) -> Result<Payment, sqlx::Error>;

    async fn get_payment_by_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Payment>, sqlx::Error>;
}

#[async_trait]
impl PaymentExt for DBClient {
    async fn create_payment(
        &self,
        booking_id: Uuid,
        amount: BigDecimal,
        currency: String,
        payment_method: PaymentMethod,
        processing_fee: BigDecimal,
        platform_fee: BigDecimal,
        provider_amount: BigDecimal,
        description: Option<String>,
    ) -> Result<Payment, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                booking_id, amount, currency, payment_method,
                processing_fee, platform_fee, provider_amount, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id, booking_id, amount, currency, status, payment_method,
                processing_fee, platform_fee, provider_amount, description,
                is_active, created_at, updated_at
            "#,
        )
        .bind(booking_id)
        .bind(amount)
        .bind(currency)
        .bind(payment_method)
        .bind(processing_fee)
        .bind(platform_fee)
        .bind(provider_amount)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_payment_by_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT
                id, booking_id, amount, currency, status, payment_method,
                processing_fee, platform_fee, provider_amount, description,
                is_active, created_at, updated_at
            FROM payments
            WHERE booking_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }
}
