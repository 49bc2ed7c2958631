use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::bookingmodel::{Booking, CancelledBy};

// Shared column list for bookings; every query returns the full row.
const BOOKING_COLUMNS: &str = r#"
    id, service_id, customer_id, provider_id, status, scheduled_at,
    estimated_duration_minutes, actual_start_time, actual_end_time,
    quoted_price, currency, service_address, customer_notes, provider_notes,
    requested_at, accepted_at, rejected_at, started_at, completed_at,
    cancelled_at, cancellation_reason, cancelled_by,
    is_active, created_at, updated_at
"#;

#[async_trait]
pub trait BookingExt {
    #[allow(clippy::too_many_arguments)]
    async fn create_booking(
        &self,
        service_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
        scheduled_at: DateTime<Utc>,
        estimated_duration_minutes: Option<i32>,
        quoted_price: BigDecimal,
        service_address: Option<String>,
        customer_notes: Option<String>,
    ) -> Result<Booking, sqlx::Error>;

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error>;

    async fn get_customer_bookings(
        &self,
        customer_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Booking>, sqlx::Error>;

    async fn get_customer_booking_count(&self, customer_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn get_provider_bookings(
        &self,
        provider_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Booking>, sqlx::Error>;

    async fn get_provider_booking_count(&self, provider_id: Uuid) -> Result<i64, sqlx::Error>;

    /// Each transition below carries its source-state guard in the WHERE
    /// clause, so a raced concurrent update falls out as `None` instead of
    /// silently overwriting a newer status.
    async fn accept_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error>;

    async fn reject_booking(
        &self,
        booking_id: Uuid,
        reason: Option<String>,
    ) -> Result<Option<Booking>, sqlx::Error>;

    async fn start_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error>;

    async fn complete_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error>;

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        cancelled_by: CancelledBy,
        reason: Option<String>,
    ) -> Result<Option<Booking>, sqlx::Error>;
}

#[async_trait]
impl BookingExt for DBClient {
    async fn create_booking(
        &self,
        service_id: Uuid,
        customer_id: Uuid,
        provider_id: Uuid,
        scheduled_at: DateTime<Utc>,
        estimated_duration_minutes: Option<i32>,
        quoted_price: BigDecimal,
        service_address: Option<String>,
        customer_notes: Option<String>,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO bookings (
                service_id, customer_id, provider_id, scheduled_at,
                estimated_duration_minutes, quoted_price, service_address,
                customer_notes, status, requested_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'requested'::booking_status, NOW())
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(service_id)
            .bind(customer_id)
            .bind(provider_id)
            .bind(scheduled_at)
            .bind(estimated_duration_minutes)
            .bind(quoted_price)
            .bind(service_address)
            .bind(customer_notes)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE id = $1 AND is_active = TRUE
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_customer_bookings(
        &self,
        customer_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let offset = page as i64 * size as i64;
        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE customer_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(customer_id)
            .bind(size as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_customer_booking_count(&self, customer_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE customer_id = $1 AND is_active = TRUE",
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_provider_bookings(
        &self,
        provider_id: Uuid,
        page: u32,
        size: u32,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let offset = page as i64 * size as i64;
        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE provider_id = $1 AND is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(provider_id)
            .bind(size as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_provider_booking_count(&self, provider_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE provider_id = $1 AND is_active = TRUE",
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn accept_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE bookings
            SET status = 'accepted'::booking_status,
                accepted_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'requested'::booking_status AND is_active = TRUE
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn reject_booking(
        &self,
        booking_id: Uuid,
        reason: Option<String>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE bookings
            SET status = 'rejected'::booking_status,
                rejected_at = NOW(),
                cancellation_reason = $2,
                cancelled_by = 'provider'::cancelled_by,
                updated_at = NOW()
            WHERE id = $1 AND status = 'requested'::booking_status AND is_active = TRUE
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .bind(reason)
            .fetch_optional(&self.pool)
            .await
    }

    async fn start_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE bookings
            SET status = 'in_progress'::booking_status,
                started_at = NOW(),
                actual_start_time = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'accepted'::booking_status AND is_active = TRUE
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn complete_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE bookings
            SET status = 'completed'::booking_status,
                completed_at = NOW(),
                actual_end_time = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'in_progress'::booking_status AND is_active = TRUE
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        cancelled_by: CancelledBy,
        reason: Option<String>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled'::booking_status,
                cancelled_at = NOW(),
                cancelled_by = $2,
                cancellation_reason = $3,
                updated_at = NOW()
            WHERE id = $1
              AND status IN ('requested'::booking_status, 'accepted'::booking_status)
              AND is_active = TRUE
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Booking>(&query)
            .bind(booking_id)
            .bind(cancelled_by)
            .bind(reason)
            .fetch_optional(&self.pool)
            .await
    }
}
