#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_access_maxage: i64,
    pub jwt_refresh_maxage: i64,
    pub port: u16,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");

        // Token lifetimes in seconds (access short-lived, refresh long-lived)
        let jwt_access_maxage =
            std::env::var("JWT_ACCESS_MAXAGE").unwrap_or_else(|_| "900".to_string());
        let jwt_refresh_maxage =
            std::env::var("JWT_REFRESH_MAXAGE").unwrap_or_else(|_| "604800".to_string());

        let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());

        Config {
            database_url,
            jwt_secret,
            jwt_access_maxage: jwt_access_maxage
                .parse::<i64>()
                .expect("JWT_ACCESS_MAXAGE must be a number of seconds"),
            jwt_refresh_maxage: jwt_refresh_maxage
                .parse::<i64>()
                .expect("JWT_REFRESH_MAXAGE must be a number of seconds"),
            port: port.parse::<u16>().expect("PORT must be a valid port number"),
        }
    }
}
