mod config;
mod db;
mod error;
mod files;
mod handlers;
mod lifecycle;
mod models;
mod query;
mod reconcile;
mod routes;
mod state;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::Config, files::FileStore, state::AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Configuración incompleta, revisa el .env");

    let pool = db::connect(&config)
        .await
        .expect("Error al conectar a la Base de Datos. ¿Está corriendo Postgres?");
    tracing::info!("✅ Conexión a Postgres exitosa");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Error aplicando migraciones");

    let files = FileStore::new(&config.upload_dir)
        .await
        .expect("No se pudo preparar la carpeta de uploads");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let port = config.port;
    let state = AppState {
        pool,
        files,
        config: Arc::new(config),
    };

    let app = routes::create_routes(state).layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", port)
        .parse()
        .expect("Dirección IP/Puerto inválido");

    tracing::info!("🚀 Servidor de noticias corriendo en http://{}", addr);

    let listener = TcpListener::bind(addr).await.expect("Fallo al enlazar el puerto");
    axum::serve(listener, app).await.unwrap();
}
