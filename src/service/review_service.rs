use std::sync::Arc;

use bigdecimal::rounding::RoundingMode;
use num_traits::FromPrimitive;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use crate::{
    db::{bookingdb::BookingExt, db::DBClient, reviewdb::ReviewExt, servicedb::ServiceExt},
    dtos::reviewdtos::CreateReviewDto,
    models::{bookingmodel::BookingStatus, reviewmodel::Review},
    service::error::ServiceError,
};

#[derive(Debug, Clone)]
pub struct ReviewService {
    db_client: Arc<DBClient>,
}

impl ReviewService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    /// Preconditions checked in order, each with its own failure: booking
    /// exists, belongs to the caller, is COMPLETED, and has no review yet.
    pub async fn create_review(
        &self,
        customer_id: Uuid,
        review_data: CreateReviewDto,
    ) -> Result<Review, ServiceError> {
        let booking = self
            .db_client
            .get_booking(review_data.booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(review_data.booking_id))?;

        if booking.customer_id != customer_id {
            return Err(ServiceError::NotReviewOwner);
        }

        if booking.status != BookingStatus::Completed {
            return Err(ServiceError::BookingNotCompleted);
        }

        if self
            .db_client
            .review_exists_for_booking(booking.id)
            .await?
        {
            return Err(ServiceError::DuplicateReview);
        }

        let review = self
            .db_client
            .create_review(
                booking.id,
                customer_id,
                booking.service_id,
                booking.provider_id,
                to_rating(review_data.overall_rating)?,
                review_data.quality_rating.map(to_rating).transpose()?,
                review_data.communication_rating.map(to_rating).transpose()?,
                review_data.punctuality_rating.map(to_rating).transpose()?,
                review_data.value_rating.map(to_rating).transpose()?,
                review_data.title,
                review_data.comment,
            )
            .await?;

        // The denormalized aggregate is eventually consistent: a failed
        // recompute is logged and swallowed, never unwinding the review.
        if let Err(e) = self.refresh_service_rating(booking.service_id).await {
            tracing::error!(
                "failed to update ratings for service {}: {}",
                booking.service_id,
                e
            );
        }

        tracing::info!(
            "review {} created for booking {} by customer {}",
            review.id,
            booking.id,
            customer_id
        );

        Ok(review)
    }

    pub async fn respond_to_review(
        &self,
        review_id: Uuid,
        provider_id: Uuid,
        response: String,
    ) -> Result<Review, ServiceError> {
        let review = self
            .db_client
            .get_review(review_id)
            .await?
            .ok_or(ServiceError::ReviewNotFound(review_id))?;

        if review.provider_id != provider_id {
            return Err(ServiceError::NotReviewProvider);
        }

        let updated = self
            .db_client
            .set_provider_response(review_id, response)
            .await?;

        Ok(updated)
    }

    async fn refresh_service_rating(&self, service_id: Uuid) -> Result<(), ServiceError> {
        let (average, count) = self.db_client.get_service_rating(service_id).await?;

        let average = average
            .map(|avg| avg.with_scale_round(2, RoundingMode::HalfUp))
            .unwrap_or_else(|| BigDecimal::from(0));

        self.db_client
            .update_service_rating(service_id, average, count as i32)
            .await?;

        Ok(())
    }
}

/// Ratings arrive as floats from JSON and are stored as NUMERIC(2,1).
fn to_rating(value: f64) -> Result<BigDecimal, ServiceError> {
    BigDecimal::from_f64(value)
        .map(|rating| rating.with_scale_round(1, RoundingMode::HalfUp))
        .ok_or_else(|| ServiceError::Validation("Rating is not a valid number".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn ratings_are_stored_with_one_decimal() {
        assert_eq!(to_rating(4.5).unwrap(), BigDecimal::from_str("4.5").unwrap());
        assert_eq!(to_rating(5.0).unwrap(), BigDecimal::from_str("5.0").unwrap());
        // Float noise rounds to the nearest tenth.
        assert_eq!(
            to_rating(3.450001).unwrap(),
            BigDecimal::from_str("3.5").unwrap()
        );
    }

    #[test]
    fn non_finite_ratings_are_rejected() {
        assert!(to_rating(f64::NAN).is_err());
    }
}
