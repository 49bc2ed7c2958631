use thiserror::Error;
use uuid::Uuid;

use crate::{error::HttpError, models::bookingmodel::BookingStatus};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Booking {0} not found")]
    BookingNotFound(Uuid),

    #[error("Service {0} not found")]
    ServiceNotFound(Uuid),

    #[error("Review {0} not found")]
    ReviewNotFound(Uuid),

    #[error("No payment recorded for booking {0}")]
    PaymentNotFound(Uuid),

    #[error("Booking {booking_id} cannot be {action} in current status {current:?}")]
    InvalidBookingStatus {
        booking_id: Uuid,
        current: BookingStatus,
        action: &'static str,
    },

    #[error("You can only manage bookings for your own services")]
    NotBookingProvider,

    #[error("You can only cancel your own bookings")]
    NotBookingCustomer,

    #[error("You don't have access to this booking")]
    NoBookingAccess,

    #[error("Service is currently not available for booking")]
    ServiceUnavailable,

    #[error("Scheduled date and time must be in the future")]
    ScheduledInPast,

    #[error("You can only review your own bookings")]
    NotReviewOwner,

    #[error("You can only review completed bookings")]
    BookingNotCompleted,

    #[error("You have already reviewed this booking")]
    DuplicateReview,

    #[error("You can only respond to reviews of your own services")]
    NotReviewProvider,

    #[error("A payment already exists for booking {0}")]
    DuplicatePayment(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::BookingNotFound(_)
            | ServiceError::ServiceNotFound(_)
            | ServiceError::ReviewNotFound(_)
            | ServiceError::PaymentNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::InvalidBookingStatus { .. }
            | ServiceError::DuplicateReview
            | ServiceError::DuplicatePayment(_) => HttpError::conflict(error.to_string()),

            ServiceError::NotBookingProvider
            | ServiceError::NotBookingCustomer
            | ServiceError::NoBookingAccess
            | ServiceError::ServiceUnavailable
            | ServiceError::ScheduledInPast
            | ServiceError::NotReviewOwner
            | ServiceError::NotReviewProvider
            | ServiceError::BookingNotCompleted
            | ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::Database(_) => HttpError::server_error(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn status_mapping() {
        let id = Uuid::new_v4();

        let not_found: HttpError = ServiceError::BookingNotFound(id).into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);

        let conflict: HttpError = ServiceError::InvalidBookingStatus {
            booking_id: id,
            current: BookingStatus::Completed,
            action: "accepted",
        }
        .into();
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let duplicate: HttpError = ServiceError::DuplicateReview.into();
        assert_eq!(duplicate.status, StatusCode::CONFLICT);

        let ownership: HttpError = ServiceError::NotBookingCustomer.into();
        assert_eq!(ownership.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_status_error_names_the_current_status() {
        let id = Uuid::new_v4();
        let error = ServiceError::InvalidBookingStatus {
            booking_id: id,
            current: BookingStatus::Cancelled,
            action: "completed",
        };
        let message = error.to_string();
        assert!(message.contains("Cancelled"));
        assert!(message.contains("completed"));
    }
}
