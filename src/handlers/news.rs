use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::ApiError,
    files::{FileStore, MAX_IMAGE_BYTES, MAX_VIDEO_BYTES},
    lifecycle::{self, ArticleInput, MediaEdit},
    models::news::Article,
    query::{self, date_range, NewsFilter, Page},
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsListParams {
    pub page_number: Option<String>,
    pub keyword: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub province: Option<String>,
}

/// Campos del formulario multipart de crear/editar noticia.
/// Los archivos ya quedaron guardados en disco al leer el formulario.
#[derive(Debug, Default)]
struct NewsForm {
    title: Option<String>,
    content: Option<String>,
    author: Option<String>,
    province: Option<String>,
    tags: Vec<String>,
    category_id: Option<i32>,
    old_images: Vec<String>,
    old_videos: Vec<String>,
    images: Vec<String>,
    videos: Vec<String>,
}

impl NewsForm {
    /// Campos de texto; los repetidos (`tags`, `oldImages`, `oldVideos`) se acumulan.
    fn push_text(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = Some(value),
            "content" => self.content = Some(value),
            "author" => self.author = Some(value),
            "province" => self.province = Some(value),
            "tags" => self.tags.push(value),
            "categoryId" => self.category_id = value.trim().parse().ok(),
            "oldImages" => self.old_images.push(value),
            "oldVideos" => self.old_videos.push(value),
            _ => {}
        }
    }

    /// Para crear: todos los campos escalares son obligatorios.
    fn take_input(&mut self) -> Option<ArticleInput> {
        Some(ArticleInput {
            title: self.title.take()?,
            content: self.content.take()?,
            author: self.author.take()?,
            province: self.province.take()?,
            tags: std::mem::take(&mut self.tags),
            category_id: self.category_id?,
        })
    }

    /// Para editar: el cliente reenvía el estado completo; lo que no llegue
    /// queda vacío (no hay merge parcial de campos).
    fn take_full_state(&mut self) -> Option<ArticleInput> {
        Some(ArticleInput {
            title: self.title.take().unwrap_or_default(),
            content: self.content.take().unwrap_or_default(),
            author: self.author.take().unwrap_or_default(),
            province: self.province.take().unwrap_or_default(),
            tags: std::mem::take(&mut self.tags),
            category_id: self.category_id?,
        })
    }

    fn take_media_edit(&mut self) -> MediaEdit {
        MediaEdit {
            keep_images: std::mem::take(&mut self.old_images),
            keep_videos: std::mem::take(&mut self.old_videos),
            new_images: std::mem::take(&mut self.images),
            new_videos: std::mem::take(&mut self.videos),
        }
    }
}

/// Valida tipo y tamaño de un archivo subido.
fn check_upload(
    content_type: Option<&mime::Mime>,
    size: usize,
    expected: mime::Name<'_>,
    max_bytes: usize,
) -> Result<(), ApiError> {
    if size > max_bytes {
        return Err(ApiError::BadRequest(format!(
            "File exceeds the {} MB limit",
            max_bytes / (1024 * 1024)
        )));
    }
    if let Some(ct) = content_type {
        if ct.type_() != expected {
            return Err(ApiError::BadRequest(format!("Unsupported file type {ct}")));
        }
    }
    Ok(())
}

/// Recorre el multipart: guarda los archivos de `images`/`videos` y
/// acumula el resto como texto.
async fn read_news_form(mut multipart: Multipart, files: &FileStore) -> Result<NewsForm, ApiError> {
    let mut form = NewsForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "images" | "videos" => {
                let original = field.file_name().unwrap_or("unknown.bin").to_string();
                let content_type = field
                    .content_type()
                    .and_then(|ct| ct.parse::<mime::Mime>().ok());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Error reading file upload: {e}")))?;

                if name == "images" {
                    check_upload(content_type.as_ref(), data.len(), mime::IMAGE, MAX_IMAGE_BYTES)?;
                    form.images.push(files.save(&original, &data).await?);
                } else {
                    check_upload(content_type.as_ref(), data.len(), mime::VIDEO, MAX_VIDEO_BYTES)?;
                    form.videos.push(files.save(&original, &data).await?);
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid form field: {e}")))?;
                form.push_text(&name, value);
            }
        }
    }

    Ok(form)
}

async fn fetch_page(
    state: &AppState,
    filter: &NewsFilter,
    page: &Page,
) -> sqlx::Result<(Vec<Article>, i64)> {
    let total = query::count_articles(&state.pool, filter).await?;
    let articles = query::fetch_articles(&state.pool, filter, page).await?;
    Ok((articles, total))
}

fn internal_error(context: &str, e: sqlx::Error) -> Response {
    tracing::error!("{context}: {e:?}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "Error interno" })),
    )
        .into_response()
}

fn not_found_news() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "News not found" })),
    )
        .into_response()
}

// POST /api/news — multipart con campos + archivos en "images"/"videos"
pub async fn create_news_handler(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut form = match read_news_form(multipart, &state.files).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    // El cliente espera 500 ante datos incompletos, no 400
    let Some(input) = form.take_input() else {
        return create_failed();
    };

    match lifecycle::create_article(&state.pool, input, form.images, form.videos).await {
        Ok(article) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "News created successfully",
                "data": article,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error al crear noticia: {e:?}");
            create_failed()
        }
    }
}

fn create_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "Failed to create news item" })),
    )
        .into_response()
}

// PUT /api/news/:newsId — multipart con campos + "oldImages"/"oldVideos" a conservar
pub async fn update_news_handler(
    State(state): State<AppState>,
    Path(news_id): Path<i32>,
    multipart: Multipart,
) -> Response {
    let mut form = match read_news_form(multipart, &state.files).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let edit = form.take_media_edit();
    let Some(input) = form.take_full_state() else {
        return update_failed();
    };

    match lifecycle::update_article(&state.pool, &state.files, news_id, input, edit).await {
        Ok(article) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "News updated successfully",
                "data": article,
            })),
        )
            .into_response(),
        Err(ApiError::NotFound(_)) => not_found_news(),
        Err(e) => {
            tracing::error!("Error actualizando noticia {news_id}: {e:?}");
            update_failed()
        }
    }
}

fn update_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "Failed to update news item" })),
    )
        .into_response()
}

// DELETE /api/news/:newsId
pub async fn delete_news_handler(
    State(state): State<AppState>,
    Path(news_id): Path<i32>,
) -> Response {
    match lifecycle::delete_article(&state.pool, &state.files, news_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "success": true, "message": "News removed successfully" })),
        )
            .into_response(),
        Err(ApiError::NotFound(_)) => not_found_news(),
        Err(e) => {
            tracing::error!("Error eliminando noticia {news_id}: {e:?}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Failed to remove news item" })),
            )
                .into_response()
        }
    }
}

// GET /api/news/:newsId
pub async fn get_news_handler(State(state): State<AppState>, Path(news_id): Path<i32>) -> Response {
    match query::fetch_article(&state.pool, news_id).await {
        Ok(Some(article)) => {
            (StatusCode::OK, Json(json!({ "success": true, "data": article }))).into_response()
        }
        Ok(None) => not_found_news(),
        Err(e) => internal_error("Error buscando noticia", e),
    }
}

// GET /api/news — portada; una página vacía responde 404 (contrato del cliente)
pub async fn list_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    let filter = NewsFilter {
        keyword: params.keyword,
        ..Default::default()
    };
    let page = Page::new(params.page_number.as_deref(), state.config.page_size_feed);

    match fetch_page(&state, &filter, &page).await {
        Ok((articles, _)) if articles.is_empty() => not_found_news(),
        Ok((articles, total)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "meta": { "page": page.number, "pages": page.pages(total) },
                "data": articles,
            })),
        )
            .into_response(),
        Err(e) => internal_error("Error listando noticias", e),
    }
}

// GET /api/news/search — siempre 200; page y pages van al nivel superior
pub async fn search_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    let filter = NewsFilter {
        keyword: params.keyword,
        created_between: date_range(
            params.from_date.as_deref(),
            params.to_date.as_deref(),
            Utc::now(),
        ),
        ..Default::default()
    };
    let page = Page::new(params.page_number.as_deref(), state.config.page_size_search);

    match fetch_page(&state, &filter, &page).await {
        Ok((articles, total)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "page": page.number,
                "pages": page.pages(total),
                "data": articles,
            })),
        )
            .into_response(),
        Err(e) => internal_error("Error buscando noticias", e),
    }
}

// GET /api/news/province?province=...
pub async fn province_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    let page = Page::new(params.page_number.as_deref(), state.config.page_size_province);
    let province = params.province.as_deref().map(str::trim).unwrap_or("");

    // Sin provincia no hay nada que buscar
    if province.is_empty() {
        return (
            StatusCode::OK,
            Json(json!({ "success": true, "page": page.number, "pages": 0, "data": [] })),
        )
            .into_response();
    }

    let filter = NewsFilter {
        province: Some(province.to_string()),
        ..Default::default()
    };

    match fetch_page(&state, &filter, &page).await {
        Ok((articles, total)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "meta": { "page": page.number, "pages": page.pages(total) },
                "data": articles,
            })),
        )
            .into_response(),
        Err(e) => internal_error("Error listando por provincia", e),
    }
}

// GET /api/news/:newsId/similar — hasta 10 de la misma categoría
pub async fn similar_news_handler(
    State(state): State<AppState>,
    Path(news_id): Path<i32>,
) -> Response {
    let category_id: Option<i32> =
        match sqlx::query_scalar("SELECT category_id FROM news WHERE id = $1")
            .bind(news_id)
            .fetch_optional(&state.pool)
            .await
        {
            Ok(row) => row,
            Err(e) => return internal_error("Error buscando noticia", e),
        };

    let Some(category_id) = category_id else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "News not found" })),
        )
            .into_response();
    };

    match query::fetch_similar(&state.pool, news_id, category_id, state.config.similar_limit).await
    {
        Ok(articles) if articles.is_empty() => (
            StatusCode::OK,
            Json(json!({
                "success": false,
                "message": "No similar news found",
                "data": [],
            })),
        )
            .into_response(),
        Ok(articles) => {
            (StatusCode::OK, Json(json!({ "success": true, "data": articles }))).into_response()
        }
        Err(e) => internal_error("Error buscando noticias similares", e),
    }
}

/// Portada fija por categoría, combinable con keyword; vacío responde 404.
async fn news_by_category(state: AppState, params: NewsListParams, category: &str) -> Response {
    let filter = NewsFilter {
        keyword: params.keyword,
        category_name: Some(category.to_string()),
        ..Default::default()
    };
    let page = Page::new(params.page_number.as_deref(), state.config.page_size_search);

    match fetch_page(&state, &filter, &page).await {
        Ok((articles, _)) if articles.is_empty() => not_found_news(),
        Ok((articles, total)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "meta": { "page": page.number, "pages": page.pages(total) },
                "data": articles,
            })),
        )
            .into_response(),
        Err(e) => internal_error("Error listando por categoría", e),
    }
}

// Las portadas fijas que consume el cliente, una por sección
pub async fn politics_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    news_by_category(state, params, "politics").await
}

pub async fn nepalbrand_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    news_by_category(state, params, "nepalbrand").await
}

pub async fn market_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    news_by_category(state, params, "market").await
}

pub async fn social_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    news_by_category(state, params, "social").await
}

pub async fn art_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    news_by_category(state, params, "art").await
}

pub async fn sports_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    news_by_category(state, params, "sports").await
}

pub async fn blog_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    news_by_category(state, params, "blog").await
}

pub async fn global_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    news_by_category(state, params, "global").await
}

pub async fn idea_news_handler(
    State(state): State<AppState>,
    Query(params): Query<NewsListParams>,
) -> Response {
    news_by_category(state, params, "idea").await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(fields: &[(&str, &str)]) -> NewsForm {
        let mut form = NewsForm::default();
        for (name, value) in fields {
            form.push_text(name, value.to_string());
        }
        form
    }

    #[test]
    fn los_campos_repetidos_se_acumulan() {
        let form = form_with(&[
            ("tags", "economía"),
            ("tags", "bolsa"),
            ("oldImages", "uploads/a.jpg"),
            ("oldVideos", "uploads/v.mp4"),
            ("desconocido", "se-ignora"),
        ]);

        assert_eq!(form.tags, vec!["economía", "bolsa"]);
        assert_eq!(form.old_images, vec!["uploads/a.jpg"]);
        assert_eq!(form.old_videos, vec!["uploads/v.mp4"]);
        assert!(form.title.is_none());
    }

    #[test]
    fn crear_exige_todos_los_campos() {
        let mut completo = form_with(&[
            ("title", "t"),
            ("content", "c"),
            ("author", "a"),
            ("province", "p"),
            ("categoryId", "3"),
        ]);
        let input = completo.take_input().unwrap();
        assert_eq!(input.category_id, 3);

        let mut sin_titulo = form_with(&[
            ("content", "c"),
            ("author", "a"),
            ("province", "p"),
            ("categoryId", "3"),
        ]);
        assert!(sin_titulo.take_input().is_none());

        let mut categoria_basura = form_with(&[
            ("title", "t"),
            ("content", "c"),
            ("author", "a"),
            ("province", "p"),
            ("categoryId", "tres"),
        ]);
        assert!(categoria_basura.take_input().is_none());
    }

    #[test]
    fn editar_no_conserva_campos_ausentes() {
        // El cliente debe reenviar el estado completo: lo que falte queda vacío
        let mut form = form_with(&[("title", "nuevo título"), ("categoryId", "2")]);
        let input = form.take_full_state().unwrap();

        assert_eq!(input.title, "nuevo título");
        assert_eq!(input.content, "");
        assert_eq!(input.author, "");
        assert!(input.tags.is_empty());
    }

    #[test]
    fn editar_sin_categoria_no_produce_input() {
        let mut form = form_with(&[("title", "t")]);
        assert!(form.take_full_state().is_none());
    }

    #[test]
    fn valida_tamano_y_tipo_de_archivo() {
        let jpeg: mime::Mime = "image/jpeg".parse().unwrap();
        let mp4: mime::Mime = "video/mp4".parse().unwrap();

        assert!(check_upload(Some(&jpeg), 1024, mime::IMAGE, MAX_IMAGE_BYTES).is_ok());
        assert!(check_upload(Some(&mp4), 1024, mime::IMAGE, MAX_IMAGE_BYTES).is_err());
        assert!(check_upload(Some(&jpeg), MAX_IMAGE_BYTES + 1, mime::IMAGE, MAX_IMAGE_BYTES).is_err());
        // Sin content-type declarado solo aplica el límite de tamaño
        assert!(check_upload(None, 1024, mime::VIDEO, MAX_VIDEO_BYTES).is_ok());
    }
}
