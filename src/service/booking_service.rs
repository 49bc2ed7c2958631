use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{
        bookingdb::BookingExt, db::DBClient, paymentdb::PaymentExt, servicedb::ServiceExt,
    },
    dtos::bookingdtos::{CancelBookingDto, CreateBookingDto, CreatePaymentDto, RejectBookingDto},
    models::{
        bookingmodel::{Booking, BookingStatus, CancelledBy},
        paymentmodel::{self, Payment},
    },
    service::error::ServiceError,
};

/// Booking lifecycle rules. Ownership and state preconditions are checked
/// here; the matching transition SQL re-asserts the source state so a raced
/// concurrent transition cannot slip through.
#[derive(Debug, Clone)]
pub struct BookingService {
    db_client: Arc<DBClient>,
}

impl BookingService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn create_booking(
        &self,
        customer_id: Uuid,
        booking_data: CreateBookingDto,
    ) -> Result<Booking, ServiceError> {
        let service = self
            .db_client
            .get_service(booking_data.service_id)
            .await?
            .ok_or(ServiceError::ServiceNotFound(booking_data.service_id))?;

        if !service.is_available {
            return Err(ServiceError::ServiceUnavailable);
        }

        if booking_data.scheduled_at <= Utc::now() {
            return Err(ServiceError::ScheduledInPast);
        }

        // Provider and price are denormalized from the service at creation.
        let booking = self
            .db_client
            .create_booking(
                service.id,
                customer_id,
                service.provider_id,
                booking_data.scheduled_at,
                service.estimated_duration_minutes,
                service.base_price.clone(),
                booking_data.service_address,
                booking_data.customer_notes,
            )
            .await?;

        tracing::info!(
            "booking {} created for service {} by customer {}",
            booking.id,
            service.id,
            customer_id
        );

        Ok(booking)
    }

    pub async fn get_booking_for_user(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
    ) -> Result<Booking, ServiceError> {
        let booking = self.find_booking(booking_id).await?;

        if !booking.involves(user_id) {
            return Err(ServiceError::NoBookingAccess);
        }

        Ok(booking)
    }

    pub async fn accept_booking(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Booking, ServiceError> {
        let booking = self.find_booking(booking_id).await?;
        self.require_provider(&booking, provider_id)?;

        if !booking.status.can_be_accepted() {
            return Err(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "accepted",
            });
        }

        self.db_client
            .accept_booking(booking_id)
            .await?
            .ok_or(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "accepted",
            })
    }

    pub async fn reject_booking(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
        reject_data: RejectBookingDto,
    ) -> Result<Booking, ServiceError> {
        let booking = self.find_booking(booking_id).await?;
        self.require_provider(&booking, provider_id)?;

        if !booking.status.can_be_rejected() {
            return Err(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "rejected",
            });
        }

        self.db_client
            .reject_booking(booking_id, reject_data.reason)
            .await?
            .ok_or(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "rejected",
            })
    }

    pub async fn start_booking(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Booking, ServiceError> {
        let booking = self.find_booking(booking_id).await?;
        self.require_provider(&booking, provider_id)?;

        if !booking.status.can_be_started() {
            return Err(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "started",
            });
        }

        self.db_client
            .start_booking(booking_id)
            .await?
            .ok_or(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "started",
            })
    }

    pub async fn complete_booking(
        &self,
        booking_id: Uuid,
        provider_id: Uuid,
    ) -> Result<Booking, ServiceError> {
        let booking = self.find_booking(booking_id).await?;
        self.require_provider(&booking, provider_id)?;

        if !booking.status.can_be_completed() {
            return Err(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "completed",
            });
        }

        let completed = self
            .db_client
            .complete_booking(booking_id)
            .await?
            .ok_or(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "completed",
            })?;

        tracing::info!(
            "booking {} completed by provider {}",
            completed.id,
            provider_id
        );

        Ok(completed)
    }

    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
        is_admin: bool,
        cancel_data: CancelBookingDto,
    ) -> Result<Booking, ServiceError> {
        let booking = self.find_booking(booking_id).await?;

        let cancelled_by = if booking.customer_id == user_id {
            CancelledBy::Customer
        } else if is_admin {
            CancelledBy::Admin
        } else {
            return Err(ServiceError::NotBookingCustomer);
        };

        if !booking.status.can_be_cancelled() {
            return Err(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "cancelled",
            });
        }

        self.db_client
            .cancel_booking(booking_id, cancelled_by, cancel_data.reason)
            .await?
            .ok_or(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "cancelled",
            })
    }

    /// Records the passive payment ledger row for a booking. Fees are fixed
    /// percentages computed once here; no booking transition is triggered.
    pub async fn record_payment(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        payment_data: CreatePaymentDto,
    ) -> Result<Payment, ServiceError> {
        let booking = self.find_booking(booking_id).await?;

        if booking.customer_id != customer_id {
            return Err(ServiceError::NotBookingCustomer);
        }

        if booking.status == BookingStatus::Rejected
            || booking.status == BookingStatus::Cancelled
        {
            return Err(ServiceError::InvalidBookingStatus {
                booking_id,
                current: booking.status,
                action: "paid",
            });
        }

        if self
            .db_client
            .get_payment_by_booking(booking_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::DuplicatePayment(booking_id));
        }

        let amount = payment_data
            .amount
            .unwrap_or_else(|| booking.quoted_price.clone());
        let fees = paymentmodel::compute_fees(&amount);

        let payment = self
            .db_client
            .create_payment(
                booking_id,
                amount,
                booking.currency.clone(),
                payment_data.payment_method,
                fees.processing_fee,
                fees.platform_fee,
                fees.provider_amount,
                payment_data.description,
            )
            .await?;

        Ok(payment)
    }

    pub async fn get_payment_for_user(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
    ) -> Result<Payment, ServiceError> {
        let booking = self.find_booking(booking_id).await?;

        if !booking.involves(user_id) {
            return Err(ServiceError::NoBookingAccess);
        }

        self.db_client
            .get_payment_by_booking(booking_id)
            .await?
            .ok_or(ServiceError::PaymentNotFound(booking_id))
    }

    async fn find_booking(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        self.db_client
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))
    }

    fn require_provider(&self, booking: &Booking, provider_id: Uuid) -> Result<(), ServiceError> {
        if booking.provider_id != provider_id {
            return Err(ServiceError::NotBookingProvider);
        }
        Ok(())
    }
}
