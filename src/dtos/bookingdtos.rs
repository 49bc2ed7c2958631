use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dtos::servicedtos::validate_positive_amount;
use crate::models::paymentmodel::PaymentMethod;

pub fn validate_future_datetime(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *value <= Utc::now() {
        let mut error = ValidationError::new("not_in_future");
        error.message = Some("Scheduled date and time must be in the future".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingDto {
    pub service_id: Uuid,

    #[validate(custom = "validate_future_datetime")]
    pub scheduled_at: DateTime<Utc>,

    #[validate(length(max = 500, message = "Service address must not exceed 500 characters"))]
    pub service_address: Option<String>,

    #[validate(length(max = 1000, message = "Customer notes must not exceed 1000 characters"))]
    pub customer_notes: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RejectBookingDto {
    #[validate(length(max = 500, message = "Reason must not exceed 500 characters"))]
    pub reason: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CancelBookingDto {
    #[validate(length(max = 500, message = "Reason must not exceed 500 characters"))]
    pub reason: Option<String>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentDto {
    pub payment_method: PaymentMethod,

    // Defaults to the booking's quoted price when absent
    #[validate(custom = "validate_positive_amount")]
    pub amount: Option<BigDecimal>,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn booking_must_be_scheduled_in_the_future() {
        let dto = CreateBookingDto {
            service_id: Uuid::new_v4(),
            scheduled_at: Utc::now() - Duration::hours(1),
            service_address: None,
            customer_notes: None,
        };
        assert!(dto.validate().is_err());

        let dto = CreateBookingDto {
            scheduled_at: Utc::now() + Duration::hours(1),
            ..dto
        };
        assert!(dto.validate().is_ok());
    }
}
