use std::str::FromStr;

use bigdecimal::rounding::RoundingMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Authorized,
    Captured,
    Completed,
    Failed,
    Cancelled,
    Refunded,
    PartiallyRefunded,
}

impl PaymentStatus {
    pub fn to_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Authorized => "AUTHORIZED",
            PaymentStatus::Captured => "CAPTURED",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Cancelled => "CANCELLED",
            PaymentStatus::Refunded => "REFUNDED",
            PaymentStatus::PartiallyRefunded => "PARTIALLY_REFUNDED",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentStatus::Completed | PaymentStatus::Captured)
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Completed
                | PaymentStatus::Failed
                | PaymentStatus::Cancelled
                | PaymentStatus::Refunded
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    BankTransfer,
    DigitalWallet,
    Cash,
}

/// Passive ledger record, one-to-one with a booking. Fees are computed once
/// at creation; no booking transition reads or writes payments.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: BigDecimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub processing_fee: BigDecimal,
    pub platform_fee: BigDecimal,
    pub provider_amount: BigDecimal,
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeeBreakdown {
    pub processing_fee: BigDecimal,
    pub platform_fee: BigDecimal,
    pub provider_amount: BigDecimal,
}

/// Fixed percentage rules: gateway processing fee 2.9% + 2.00 flat, platform
/// fee 5%, provider net = amount - both fees. All amounts rounded to 2 dp.
pub fn compute_fees(amount: &BigDecimal) -> FeeBreakdown {
    let processing_rate = BigDecimal::from_str("0.029").unwrap_or_default();
    let processing_flat = BigDecimal::from_str("2.00").unwrap_or_default();
    let platform_rate = BigDecimal::from_str("0.05").unwrap_or_default();

    let processing_fee =
        (amount * processing_rate + processing_flat).with_scale_round(2, RoundingMode::HalfUp);
    let platform_fee = (amount * platform_rate).with_scale_round(2, RoundingMode::HalfUp);
    let provider_amount =
        (amount - &processing_fee - &platform_fee).with_scale_round(2, RoundingMode::HalfUp);

    FeeBreakdown {
        processing_fee,
        platform_fee,
        provider_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    #[test]
    fn fees_for_a_round_amount() {
        let fees = compute_fees(&dec("100.00"));
        assert_eq!(fees.processing_fee, dec("4.90"));
        assert_eq!(fees.platform_fee, dec("5.00"));
        assert_eq!(fees.provider_amount, dec("90.10"));
    }

    #[test]
    fn fees_round_half_up() {
        // 49.99 * 0.029 = 1.44971 -> 2.00 + 1.44971 = 3.44971 -> 3.45
        // 49.99 * 0.05 = 2.4995 -> 2.50
        let fees = compute_fees(&dec("49.99"));
        assert_eq!(fees.processing_fee, dec("3.45"));
        assert_eq!(fees.platform_fee, dec("2.50"));
        assert_eq!(fees.provider_amount, dec("44.04"));
    }

    #[test]
    fn breakdown_sums_back_to_amount() {
        for amount in ["10.00", "250.50", "999.99"] {
            let amount = dec(amount);
            let fees = compute_fees(&amount);
            assert_eq!(
                &fees.processing_fee + &fees.platform_fee + &fees.provider_amount,
                amount.with_scale(2)
            );
        }
    }

    #[test]
    fn completed_and_captured_count_as_success() {
        assert!(PaymentStatus::Completed.is_success());
        assert!(PaymentStatus::Captured.is_success());
        assert!(!PaymentStatus::Pending.is_success());
        assert!(!PaymentStatus::Refunded.is_success());
    }
}
