use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewDto {
    pub booking_id: Uuid,

    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1.0 and 5.0"))]
    pub overall_rating: f64,

    #[validate(range(min = 1.0, max = 5.0, message = "Quality rating must be between 1.0 and 5.0"))]
    pub quality_rating: Option<f64>,

    #[validate(range(
        min = 1.0,
        max = 5.0,
        message = "Communication rating must be between 1.0 and 5.0"
    ))]
    pub communication_rating: Option<f64>,

    #[validate(range(
        min = 1.0,
        max = 5.0,
        message = "Punctuality rating must be between 1.0 and 5.0"
    ))]
    pub punctuality_rating: Option<f64>,

    #[validate(range(
        min = 1.0,
        max = 5.0,
        message = "Value for money rating must be between 1.0 and 5.0"
    ))]
    pub value_rating: Option<f64>,

    #[validate(length(max = 500, message = "Title must not exceed 500 characters"))]
    pub title: Option<String>,

    #[validate(length(
        min = 10,
        max = 1000,
        message = "Review comment must be between 10 and 1000 characters"
    ))]
    pub comment: String,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponseDto {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Response must be between 1 and 1000 characters"
    ))]
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_dto() -> CreateReviewDto {
        CreateReviewDto {
            booking_id: Uuid::new_v4(),
            overall_rating: 4.5,
            quality_rating: None,
            communication_rating: None,
            punctuality_rating: None,
            value_rating: None,
            title: None,
            comment: "Arrived on time, great work.".to_string(),
        }
    }

    #[test]
    fn rating_bounds() {
        assert!(base_dto().validate().is_ok());

        let too_low = CreateReviewDto {
            overall_rating: 0.5,
            ..base_dto()
        };
        assert!(too_low.validate().is_err());

        let too_high = CreateReviewDto {
            overall_rating: 5.1,
            ..base_dto()
        };
        assert!(too_high.validate().is_err());
    }

    #[test]
    fn comment_must_be_substantial() {
        let short = CreateReviewDto {
            comment: "ok".to_string(),
            ..base_dto()
        };
        assert!(short.validate().is_err());
    }
}
