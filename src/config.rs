use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration, loaded once in `main` and passed into the
/// components that need it. Nothing in this crate reads configuration from a
/// global after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub enable_cors: bool,
}

/// Deployment-level toggles for the optional parts of the product schema.
/// One canonical schema is used everywhere; these flags only control which
/// query behaviors are exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Constrain public read queries to `active = TRUE` rows.
    pub filter_inactive: bool,
    /// Register the `/api/products/filter/expired` route.
    pub expired_filter_enabled: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL is not set"))?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;

        Ok(Self {
            server: ServerConfig {
                port: env_parse("PORT", 3000),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10),
            },
            security: SecurityConfig {
                jwt_secret,
                enable_cors: env_parse("SECURITY_ENABLE_CORS", true),
            },
            catalog: CatalogConfig {
                filter_inactive: env_parse("CATALOG_FILTER_INACTIVE", true),
                expired_filter_enabled: env_parse("CATALOG_EXPIRED_FILTER", true),
            },
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_on_garbage() {
        env::set_var("CATALOG_TEST_PORT_X", "not-a-number");
        assert_eq!(env_parse("CATALOG_TEST_PORT_X", 3000u16), 3000);
        env::remove_var("CATALOG_TEST_PORT_X");
    }

    #[test]
    fn env_parse_reads_value() {
        env::set_var("CATALOG_TEST_PORT_Y", "8080");
        assert_eq!(env_parse("CATALOG_TEST_PORT_Y", 3000u16), 8080);
        env::remove_var("CATALOG_TEST_PORT_Y");
    }
}
