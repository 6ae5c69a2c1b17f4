use std::env;

/// Configuración leída una sola vez al arrancar y compartida por inyección,
/// en lugar de leer variables de entorno repartidas por los handlers.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub upload_dir: String,
    /// Portada principal
    pub page_size_feed: i64,
    /// Búsqueda y portadas por categoría (PAGINATION_LIMIT)
    pub page_size_search: i64,
    /// Noticias por provincia
    pub page_size_province: i64,
    /// Listado de categorías
    pub page_size_categories: i64,
    /// Tope de noticias similares
    pub similar_limit: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("falta la variable de entorno {0}")]
    Missing(&'static str),
    #[error("valor inválido en {0}")]
    Invalid(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let port = match env::var("PORT") {
            Ok(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 3000,
        };

        let page_size_search = env::var("PAGINATION_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8);

        Ok(Self {
            database_url,
            port,
            jwt_secret,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            page_size_feed: 30,
            page_size_search,
            page_size_province: 7,
            page_size_categories: 7,
            similar_limit: 10,
        })
    }
}
