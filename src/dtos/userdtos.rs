use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::usermodel::{RoleName, User};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserDto {
    #[validate(length(
        min = 2,
        max = 50,
        message = "First name must be between 2 and 50 characters"
    ))]
    pub first_name: String,

    #[validate(length(
        min = 2,
        max = 50,
        message = "Last name must be between 2 and 50 characters"
    ))]
    pub last_name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 8, message = "Password must be at least 8 characters long")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm password is required"),
        must_match(other = "password", message = "Password and confirm password do not match")
    )]
    pub confirm_password: String,

    #[validate(custom = "validate_phone_number")]
    pub phone_number: Option<String>,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,

    // CUSTOMER or PROVIDER; anything else is rejected at registration
    #[serde(default = "default_user_type")]
    pub user_type: String,
}

fn default_user_type() -> String {
    "CUSTOMER".to_string()
}

pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let phone_regex = regex::Regex::new(r"^\+?[1-9]\d{1,14}$")
        .map_err(|_| ValidationError::new("invalid_phone_regex"))?;

    if !phone_regex.is_match(phone) {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some("Phone number should be valid (e.g., +1234567890)".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfileDto {
    #[validate(length(
        min = 2,
        max = 50,
        message = "First name must be between 2 and 50 characters"
    ))]
    pub first_name: Option<String>,

    #[validate(length(
        min = 2,
        max = 50,
        message = "Last name must be between 2 and 50 characters"
    ))]
    pub last_name: Option<String>,

    #[validate(custom = "validate_phone_number")]
    pub phone_number: Option<String>,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,

    #[validate(url(message = "Profile image URL must be a valid URL"))]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Validate, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(
        length(min = 1, message = "New password is required"),
        length(min = 8, message = "New password must be at least 8 characters long")
    )]
    pub new_password: String,

    #[validate(
        length(min = 1, message = "Confirm new password is required"),
        must_match(
            other = "new_password",
            message = "New password and confirm password do not match"
        )
    )]
    pub confirm_new_password: String,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NearbyUsersQueryDto {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
    #[validate(range(min = 0.1, max = 500.0, message = "Radius must be between 0.1 and 500 km"))]
    pub radius_km: f64,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct UserSearchQueryDto {
    #[validate(length(min = 1, message = "Search term is required"))]
    pub q: String,
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 50))]
    pub size: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ToggleStatusQueryDto {
    pub enabled: bool,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct CheckEmailQueryDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CheckPhoneQueryDto {
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityDto {
    pub available: bool,
}

/// The user record with credentials stripped, plus resolved role names.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterUserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub profile_image_url: Option<String>,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
    pub enabled: bool,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User, roles: &[RoleName]) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            first_name: user.first_name.to_owned(),
            last_name: user.last_name.to_owned(),
            full_name: user.full_name(),
            email: user.email.to_owned(),
            phone_number: user.phone_number.clone(),
            address: user.address.clone(),
            city: user.city.clone(),
            state: user.state.clone(),
            postal_code: user.postal_code.clone(),
            country: user.country.clone(),
            latitude: user.latitude,
            longitude: user.longitude,
            profile_image_url: user.profile_image_url.clone(),
            is_email_verified: user.is_email_verified,
            is_phone_verified: user.is_phone_verified,
            enabled: user.enabled,
            roles: roles.iter().map(|role| role.to_str().to_string()).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: FilterUserDto,
}

impl AuthResponseDto {
    pub fn bearer(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user: FilterUserDto,
    ) -> Self {
        AuthResponseDto {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsDto {
    pub total_users: i64,
    pub total_customers: i64,
    pub total_providers: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_mismatched_passwords() {
        let dto = RegisterUserDto {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "a@x.com".to_string(),
            password: "Aa1!aaaa".to_string(),
            confirm_password: "different".to_string(),
            user_type: "CUSTOMER".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn register_accepts_matching_passwords() {
        let dto = RegisterUserDto {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "a@x.com".to_string(),
            password: "Aa1!aaaa".to_string(),
            confirm_password: "Aa1!aaaa".to_string(),
            user_type: "CUSTOMER".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn register_rejects_short_password() {
        let dto = RegisterUserDto {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "a@x.com".to_string(),
            password: "short".to_string(),
            confirm_password: "short".to_string(),
            user_type: "CUSTOMER".to_string(),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn phone_number_format() {
        assert!(validate_phone_number("+911234567890").is_ok());
        assert!(validate_phone_number("9123456789").is_ok());
        assert!(validate_phone_number("0123").is_err());
        assert!(validate_phone_number("not-a-phone").is_err());
    }

    #[test]
    fn user_type_defaults_to_customer() {
        let value = serde_json::json!({
            "firstName": "Asha", "lastName": "Rao", "email": "a@x.com",
            "password": "Aa1!aaaa", "confirmPassword": "Aa1!aaaa"
        });
        let dto: RegisterUserDto = serde_json::from_value(value).unwrap();
        assert_eq!(dto.user_type, "CUSTOMER");
    }
}
