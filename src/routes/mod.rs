use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::{
    handlers::{category, news, user},
    state::AppState,
};

// Margen holgado para multipart con varios videos (el límite por archivo
// se valida aparte en el handler)
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // Autenticación y usuarios
        .route("/api/user/login", post(user::login_handler))
        .route("/api/user/logout", get(user::logout_handler))
        .route("/api/user", get(user::list_users_handler))
        // Categorías
        .route(
            "/api/category",
            post(category::create_category_handler).get(category::list_categories_handler),
        )
        .route(
            "/api/category/:id",
            put(category::update_category_handler).delete(category::delete_category_handler),
        )
        // Noticias
        .route(
            "/api/news",
            post(news::create_news_handler).get(news::list_news_handler),
        )
        .route("/api/news/search", get(news::search_news_handler))
        .route("/api/news/province", get(news::province_news_handler))
        .route("/api/news/politics", get(news::politics_news_handler))
        .route("/api/news/nepalbrand", get(news::nepalbrand_news_handler))
        .route("/api/news/market", get(news::market_news_handler))
        .route("/api/news/social", get(news::social_news_handler))
        .route("/api/news/art", get(news::art_news_handler))
        .route("/api/news/sports", get(news::sports_news_handler))
        .route("/api/news/blog", get(news::blog_news_handler))
        .route("/api/news/global", get(news::global_news_handler))
        .route("/api/news/idea", get(news::idea_news_handler))
        .route(
            "/api/news/:newsId",
            get(news::get_news_handler)
                .put(news::update_news_handler)
                .delete(news::delete_news_handler),
        )
        .route("/api/news/:newsId/similar", get(news::similar_news_handler))
        // Archivos subidos, servidos tal cual
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
