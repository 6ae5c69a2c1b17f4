use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

use crate::config::Config;

// Alias para no repetir "Pool<Postgres>" por todos lados
pub type DbPool = Pool<Postgres>;

/// Crea el pool de conexiones. La URL viene de la configuración inyectada,
/// no de una variable global.
pub async fn connect(config: &Config) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
}
