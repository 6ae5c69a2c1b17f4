use std::sync::Arc;

use crate::{config::Config, db::DbPool, files::FileStore};

/// Estado compartido de la aplicación: pool de Postgres, almacén de
/// archivos y configuración. Se clona barato en cada petición.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub files: FileStore,
    pub config: Arc<Config>,
}
