pub mod booking_service;
pub mod error;
pub mod review_service;
