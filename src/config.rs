use std::env;

use anyhow::Context;

const DEFAULT_MAX_PICTURE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub db_max_connections: u32,
    /// Largest accepted ad picture upload.
    pub max_picture_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|n| n.parse::<u32>().ok())
            .unwrap_or(10);
        let max_picture_bytes = env::var("MAX_PICTURE_BYTES")
            .ok()
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_PICTURE_BYTES);
        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            db_max_connections,
            max_picture_bytes,
        })
    }

    /// Request bodies carry the picture plus the text fields of the ad form.
    pub fn body_limit(&self) -> usize {
        self.max_picture_bytes + 64 * 1024
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            jwt_secret: String::new(),
            db_max_connections: 10,
            max_picture_bytes: DEFAULT_MAX_PICTURE_BYTES,
        }
    }
}
