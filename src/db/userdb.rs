use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::dtos::userdtos::UserStatsDto;
use crate::models::usermodel::{Role, RoleName, User};

#[async_trait]
pub trait UserExt {
    async fn save_user<T: Into<String> + Send>(
        &self,
        first_name: T,
        last_name: T,
        email: T,
        password: T,
        phone_number: Option<String>,
        address: Option<String>,
        city: Option<String>,
        state: Option<String>,
        postal_code: Option<String>,
        country: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        role_id: Uuid,
    ) -> Result<User, sqlx::Error>;

    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(&self, page: u32, size: u32) -> Result<Vec<User>, sqlx::Error>;

    async fn get_user_count(&self) -> Result<i64, sqlx::Error>;

    async fn get_role_by_name(&self, name: RoleName) -> Result<Option<Role>, sqlx::Error>;

    async fn get_user_roles(&self, user_id: Uuid) -> Result<Vec<RoleName>, sqlx::Error>;

    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error>;

    async fn phone_exists(&self, phone_number: &str) -> Result<bool, sqlx::Error>;

    async fn search_users(
        &self,
        search_term: &str,
        page: u32,
        size: u32,
    ) -> Result<Vec<User>, sqlx::Error>;

    async fn search_user_count(&self, search_term: &str) -> Result<i64, sqlx::Error>;

    async fn get_users_by_role(&self, role: RoleName) -> Result<Vec<User>, sqlx::Error>;

    async fn get_users_within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<User>, sqlx::Error>;

    #[allow(clippy::too_many_arguments)]
    async fn update_user_profile(
        &self,
        user_id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
        phone_number: Option<String>,
        address: Option<String>,
        city: Option<String>,
        state: Option<String>,
        postal_code: Option<String>,
        country: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        profile_image_url: Option<String>,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password: String,
    ) -> Result<User, sqlx::Error>;

    async fn set_email_verified(&self, user_id: Uuid) -> Result<User, sqlx::Error>;

    async fn set_phone_verified(&self, user_id: Uuid) -> Result<User, sqlx::Error>;

    async fn set_user_enabled(&self, user_id: Uuid, enabled: bool) -> Result<User, sqlx::Error>;

    async fn soft_delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error>;

    async fn get_user_stats(&self) -> Result<UserStatsDto, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn save_user<T: Into<String> + Send>(
        &self,
        first_name: T,
        last_name: T,
        email: T,
        password: T,
        phone_number: Option<String>,
        address: Option<String>,
        city: Option<String>,
        state: Option<String>,
        postal_code: Option<String>,
        country: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        role_id: Uuid,
    ) -> Result<User, sqlx::Error> {
        // User row and its role link commit or roll back together.
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id, first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude,
                profile_image_url, is_email_verified, is_phone_verified, enabled,
                is_active, created_at, updated_at
            "#,
        )
        .bind(first_name.into())
        .bind(last_name.into())
        .bind(email.into())
        .bind(password.into())
        .bind(phone_number)
        .bind(address)
        .bind(city)
        .bind(state)
        .bind(postal_code)
        .bind(country)
        .bind(latitude)
        .bind(longitude)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user.id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, first_name, last_name, email, password, phone_number,
                    address, city, state, postal_code, country, latitude, longitude,
                    profile_image_url, is_email_verified, is_phone_verified, enabled,
                    is_active, created_at, updated_at
                FROM users
                WHERE id = $1 AND is_active = TRUE
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, first_name, last_name, email, password, phone_number,
                    address, city, state, postal_code, country, latitude, longitude,
                    profile_image_url, is_email_verified, is_phone_verified, enabled,
                    is_active, created_at, updated_at
                FROM users
                WHERE email = $1 AND is_active = TRUE
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(&self, page: u32, size: u32) -> Result<Vec<User>, sqlx::Error> {
        let offset = page as i64 * size as i64;

        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude,
                profile_image_url, is_email_verified, is_phone_verified, enabled,
                is_active, created_at, updated_at
            FROM users
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_user_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await
    }

    async fn get_role_by_name(&self, name: RoleName) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM roles
            WHERE name = $1 AND is_active = TRUE
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user_roles(&self, user_id: Uuid) -> Result<Vec<RoleName>, sqlx::Error> {
        sqlx::query_scalar::<_, RoleName>(
            r#"
            SELECT r.name
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1 AND r.is_active = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND is_active = TRUE)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }

    async fn phone_exists(&self, phone_number: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE phone_number = $1 AND is_active = TRUE)",
        )
        .bind(phone_number)
        .fetch_one(&self.pool)
        .await
    }

    async fn search_users(
        &self,
        search_term: &str,
        page: u32,
        size: u32,
    ) -> Result<Vec<User>, sqlx::Error> {
        let pattern = format!("%{}%", search_term);
        let offset = page as i64 * size as i64;

        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude,
                profile_image_url, is_email_verified, is_phone_verified, enabled,
                is_active, created_at, updated_at
            FROM users
            WHERE is_active = TRUE
              AND (first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn search_user_count(&self, search_term: &str) -> Result<i64, sqlx::Error> {
        let pattern = format!("%{}%", search_term);

        sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE is_active = TRUE
              AND (first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1)
            "#,
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_users_by_role(&self, role: RoleName) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                u.id, u.first_name, u.last_name, u.email, u.password, u.phone_number,
                u.address, u.city, u.state, u.postal_code, u.country, u.latitude, u.longitude,
                u.profile_image_url, u.is_email_verified, u.is_phone_verified, u.enabled,
                u.is_active, u.created_at, u.updated_at
            FROM users u
            JOIN user_roles ur ON ur.user_id = u.id
            JOIN roles r ON r.id = ur.role_id
            WHERE u.is_active = TRUE AND r.name = $1
            ORDER BY u.created_at DESC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_users_within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<User>, sqlx::Error> {
        // Haversine distance evaluated row by row; no spatial index.
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude,
                profile_image_url, is_email_verified, is_phone_verified, enabled,
                is_active, created_at, updated_at
            FROM users
            WHERE is_active = TRUE
              AND latitude IS NOT NULL
              AND longitude IS NOT NULL
              AND (6371 * acos(
                    cos(radians($1)) * cos(radians(latitude)) *
                    cos(radians(longitude) - radians($2)) +
                    sin(radians($1)) * sin(radians(latitude))
                  )) <= $3
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .bind(radius_km)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
        phone_number: Option<String>,
        address: Option<String>,
        city: Option<String>,
        state: Option<String>,
        postal_code: Option<String>,
        country: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        profile_image_url: Option<String>,
    ) -> Result<User, sqlx::Error> {
        // A changed phone number drops back to unverified. Every SET expression
        // reads the pre-update row, so the ordering below is safe.
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                is_phone_verified = CASE
                    WHEN $4::text IS NOT NULL AND $4::text IS DISTINCT FROM phone_number
                    THEN FALSE
                    ELSE is_phone_verified
                END,
                phone_number = COALESCE($4, phone_number),
                address = COALESCE($5, address),
                city = COALESCE($6, city),
                state = COALESCE($7, state),
                postal_code = COALESCE($8, postal_code),
                country = COALESCE($9, country),
                latitude = COALESCE($10, latitude),
                longitude = COALESCE($11, longitude),
                profile_image_url = COALESCE($12, profile_image_url),
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING
                id, first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude,
                profile_image_url, is_email_verified, is_phone_verified, enabled,
                is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .bind(phone_number)
        .bind(address)
        .bind(city)
        .bind(state)
        .bind(postal_code)
        .bind(country)
        .bind(latitude)
        .bind(longitude)
        .bind(profile_image_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password: String,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password = $2,
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING
                id, first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude,
                profile_image_url, is_email_verified, is_phone_verified, enabled,
                is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(password)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_email_verified(&self, user_id: Uuid) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_email_verified = TRUE,
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING
                id, first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude,
                profile_image_url, is_email_verified, is_phone_verified, enabled,
                is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_phone_verified(&self, user_id: Uuid) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_phone_verified = TRUE,
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING
                id, first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude,
                profile_image_url, is_email_verified, is_phone_verified, enabled,
                is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_user_enabled(&self, user_id: Uuid, enabled: bool) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET enabled = $2,
                updated_at = NOW()
            WHERE id = $1 AND is_active = TRUE
            RETURNING
                id, first_name, last_name, email, password, phone_number,
                address, city, state, postal_code, country, latitude, longitude,
                profile_image_url, is_email_verified, is_phone_verified, enabled,
                is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(enabled)
        .fetch_one(&self.pool)
        .await
    }

    async fn soft_delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_active = FALSE,
                enabled = FALSE,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_user_stats(&self) -> Result<UserStatsDto, sqlx::Error> {
        sqlx::query_as::<_, UserStatsDto>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users WHERE is_active = TRUE) AS total_users,
                (SELECT COUNT(DISTINCT u.id)
                   FROM users u
                   JOIN user_roles ur ON ur.user_id = u.id
                   JOIN roles r ON r.id = ur.role_id
                  WHERE u.is_active = TRUE AND r.name = 'customer'::role_name) AS total_customers,
                (SELECT COUNT(DISTINCT u.id)
                   FROM users u
                   JOIN user_roles ur ON ur.user_id = u.id
                   JOIN roles r ON r.id = ur.role_id
                  WHERE u.is_active = TRUE AND r.name = 'provider'::role_name) AS total_providers
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }
}
