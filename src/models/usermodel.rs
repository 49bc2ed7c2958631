use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "role_name", rename_all = "snake_case")]
pub enum RoleName {
    Customer,
    Provider,
    Admin,
    Moderator,
}

impl RoleName {
    pub fn to_str(&self) -> &str {
        match self {
            RoleName::Customer => "CUSTOMER",
            RoleName::Provider => "PROVIDER",
            RoleName::Admin => "ADMIN",
            RoleName::Moderator => "MODERATOR",
        }
    }

    pub fn parse(value: &str) -> Option<RoleName> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CUSTOMER" => Some(RoleName::Customer),
            "PROVIDER" => Some(RoleName::Provider),
            "ADMIN" => Some(RoleName::Admin),
            "MODERATOR" => Some(RoleName::Moderator),
            _ => None,
        }
    }

    /// Roles a user may pick for themselves at registration time.
    pub fn is_self_assignable(&self) -> bool {
        matches!(self, RoleName::Customer | RoleName::Provider)
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Role {
    pub id: Uuid,
    pub name: RoleName,
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,

    // Geolocation for the nearby-users lookup
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub profile_image_url: Option<String>,
    pub is_email_verified: bool,
    pub is_phone_verified: bool,
    pub enabled: bool,

    pub is_active: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(RoleName::parse("customer"), Some(RoleName::Customer));
        assert_eq!(RoleName::parse("PROVIDER"), Some(RoleName::Provider));
        assert_eq!(RoleName::parse(" admin "), Some(RoleName::Admin));
        assert_eq!(RoleName::parse("superuser"), None);
    }

    #[test]
    fn only_customer_and_provider_are_self_assignable() {
        assert!(RoleName::Customer.is_self_assignable());
        assert!(RoleName::Provider.is_self_assignable());
        assert!(!RoleName::Admin.is_self_assignable());
        assert!(!RoleName::Moderator.is_self_assignable());
    }
}
