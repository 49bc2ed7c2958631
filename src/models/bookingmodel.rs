use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

/// Canonical booking state machine:
/// REQUESTED -> ACCEPTED | REJECTED | CANCELLED
/// ACCEPTED  -> IN_PROGRESS | CANCELLED
/// IN_PROGRESS -> COMPLETED
/// COMPLETED, REJECTED and CANCELLED are terminal.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Requested,
    Accepted,
    Rejected,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BookingStatus::Requested => "REQUESTED",
            BookingStatus::Accepted => "ACCEPTED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Rejected | BookingStatus::Cancelled
        )
    }

    pub fn can_be_accepted(&self) -> bool {
        *self == BookingStatus::Requested
    }

    pub fn can_be_rejected(&self) -> bool {
        *self == BookingStatus::Requested
    }

    pub fn can_be_started(&self) -> bool {
        *self == BookingStatus::Accepted
    }

    pub fn can_be_completed(&self) -> bool {
        *self == BookingStatus::InProgress
    }

    pub fn can_be_cancelled(&self) -> bool {
        matches!(self, BookingStatus::Requested | BookingStatus::Accepted)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "cancelled_by", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelledBy {
    Customer,
    Provider,
    Admin,
    System,
}

impl CancelledBy {
    pub fn to_str(&self) -> &str {
        match self {
            CancelledBy::Customer => "CUSTOMER",
            CancelledBy::Provider => "PROVIDER",
            CancelledBy::Admin => "ADMIN",
            CancelledBy::System => "SYSTEM",
        }
    }
}

/// `provider_id` is denormalized from the service at creation for query
/// efficiency; it must always equal the owning service's provider.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Booking {
    pub id: Uuid,
    pub service_id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub status: BookingStatus,
    pub scheduled_at: DateTime<Utc>,
    pub estimated_duration_minutes: Option<i32>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub quoted_price: BigDecimal,
    pub currency: String,
    pub service_address: Option<String>,
    pub customer_notes: Option<String>,
    pub provider_notes: Option<String>,

    // One timestamp per transition
    pub requested_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,

    pub cancellation_reason: Option<String>,
    pub cancelled_by: Option<CancelledBy>,

    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.customer_id == user_id || self.provider_id == user_id
    }

    pub fn actual_duration_minutes(&self) -> Option<i64> {
        match (self.actual_start_time, self.actual_end_time) {
            (Some(start), Some(end)) => Some((end - start).num_minutes()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BookingStatus; 6] = [
        BookingStatus::Requested,
        BookingStatus::Accepted,
        BookingStatus::Rejected,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    #[test]
    fn accept_and_reject_only_from_requested() {
        for status in ALL {
            assert_eq!(status.can_be_accepted(), status == BookingStatus::Requested);
            assert_eq!(status.can_be_rejected(), status == BookingStatus::Requested);
        }
    }

    #[test]
    fn start_only_from_accepted() {
        for status in ALL {
            assert_eq!(status.can_be_started(), status == BookingStatus::Accepted);
        }
    }

    #[test]
    fn complete_only_from_in_progress() {
        for status in ALL {
            assert_eq!(
                status.can_be_completed(),
                status == BookingStatus::InProgress
            );
        }
    }

    #[test]
    fn cancel_only_from_requested_or_accepted() {
        for status in ALL {
            assert_eq!(
                status.can_be_cancelled(),
                matches!(status, BookingStatus::Requested | BookingStatus::Accepted)
            );
        }
    }

    #[test]
    fn terminal_states() {
        for status in ALL {
            let expected = matches!(
                status,
                BookingStatus::Completed | BookingStatus::Rejected | BookingStatus::Cancelled
            );
            assert_eq!(status.is_terminal(), expected);

            // No transition leaves a terminal state.
            if status.is_terminal() {
                assert!(!status.can_be_accepted());
                assert!(!status.can_be_rejected());
                assert!(!status.can_be_started());
                assert!(!status.can_be_completed());
                assert!(!status.can_be_cancelled());
            }
        }
    }
}
