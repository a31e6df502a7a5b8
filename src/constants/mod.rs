use crate::api::error::SystemError;

/// Hard cap on photographs attached to one listing.
pub const MAX_LISTING_IMAGES: usize = 10;

pub const DEFAULT_IMAGE_BUCKET: &str = "room-images";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024; // 10MB
pub const DEFAULT_JWT_AUDIENCE: &str = "authenticated";

pub struct Env {
    pub database_url: String,
    pub database_max_connections: u32,
    pub storage_url: String,
    pub storage_key: String,
    pub storage_bucket: String,
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub max_upload_bytes: usize,
}

impl Env {
    /// Reads configuration from `.env` (if present) and the process environment.
    pub fn new() -> Result<Self, SystemError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SystemError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| {
                SystemError::config(format!(
                    "{key} must be set in .env file or environment variable"
                ))
            })
        };

        let database_url = required("DATABASE_URL")?;
        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u32>()
            .map_err(|_| SystemError::config("DATABASE_MAX_CONNECTIONS must be a valid u32"))?;

        let storage_url = required("STORAGE_URL")?.trim_end_matches('/').to_string();
        let storage_key = required("STORAGE_KEY")?;
        let storage_bucket =
            lookup("STORAGE_BUCKET").unwrap_or_else(|| DEFAULT_IMAGE_BUCKET.to_string());

        let jwt_secret = required("JWT_SECRET")?;
        let jwt_audience =
            lookup("JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_JWT_AUDIENCE.to_string());

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| SystemError::config("MAX_UPLOAD_BYTES must be a valid usize"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Env {
            database_url,
            database_max_connections,
            storage_url,
            storage_key,
            storage_bucket,
            jwt_secret,
            jwt_audience,
            max_upload_bytes,
        })
    }
}
