//! Ciclo de vida de una noticia y su media: las dos filas se crean,
//! reescriben y borran como una sola unidad, y los archivos huérfanos
//! se reclaman fuera del camino crítico.

use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::FileStore;
use crate::models::news::Article;
use crate::query;
use crate::reconcile::reconcile;

/// Campos escalares de una noticia, ya parseados del formulario.
#[derive(Debug)]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
    pub author: String,
    pub province: String,
    pub tags: Vec<String>,
    pub category_id: i32,
}

/// Qué hacer con los archivos al editar: qué rutas viejas conservar
/// y qué subidas nuevas anexar.
#[derive(Debug, Default)]
pub struct MediaEdit {
    pub keep_images: Vec<String>,
    pub keep_videos: Vec<String>,
    pub new_images: Vec<String>,
    pub new_videos: Vec<String>,
}

/// Crea la noticia y su registro de media en una transacción: si falla la
/// segunda inserción no queda una noticia sin su mitad de media.
pub async fn create_article(
    pool: &DbPool,
    input: ArticleInput,
    images: Vec<String>,
    videos: Vec<String>,
) -> Result<Article, ApiError> {
    let mut tx = pool.begin().await?;

    let news_id: i32 = sqlx::query_scalar(
        "INSERT INTO news (title, content, author, province, tags, category_id) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.author)
    .bind(&input.province)
    .bind(&input.tags)
    .bind(input.category_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO media (images, videos, news_id) VALUES ($1, $2, $3)")
        .bind(&images)
        .bind(&videos)
        .bind(news_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    query::fetch_article(pool, news_id)
        .await?
        .ok_or(ApiError::NotFound("News not found"))
}

/// Reescribe los campos de la noticia y concilia sus archivos.
///
/// La conciliación se calcula sobre el snapshot previo de media; el borrado
/// de archivos se encola después de confirmar la transacción y nunca
/// bloquea ni revierte la escritura en la base de datos.
pub async fn update_article(
    pool: &DbPool,
    files: &FileStore,
    news_id: i32,
    input: ArticleInput,
    edit: MediaEdit,
) -> Result<Article, ApiError> {
    // Snapshot previo; también confirma que la noticia existe
    let current: Option<(Vec<String>, Vec<String>)> = sqlx::query_as(
        "SELECT m.images, m.videos FROM news n \
         JOIN media m ON m.news_id = n.id WHERE n.id = $1",
    )
    .bind(news_id)
    .fetch_optional(pool)
    .await?;

    let Some((current_images, current_videos)) = current else {
        return Err(ApiError::NotFound("News not found"));
    };

    let images = reconcile(&current_images, &edit.keep_images, &edit.new_images);
    let videos = reconcile(&current_videos, &edit.keep_videos, &edit.new_videos);

    let mut tx = pool.begin().await?;

    // El cliente reenvía el estado completo: todos los campos se pisan
    sqlx::query(
        "UPDATE news SET title = $1, content = $2, author = $3, province = $4, \
         tags = $5, category_id = $6 WHERE id = $7",
    )
    .bind(&input.title)
    .bind(&input.content)
    .bind(&input.author)
    .bind(&input.province)
    .bind(&input.tags)
    .bind(input.category_id)
    .bind(news_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE media SET images = $1, videos = $2 WHERE news_id = $3")
        .bind(&images.kept)
        .bind(&videos.kept)
        .bind(news_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    // Solo se borran rutas que venían de la base de datos
    files.schedule_delete(images.removed);
    files.schedule_delete(videos.removed);

    query::fetch_article(pool, news_id)
        .await?
        .ok_or(ApiError::NotFound("News not found"))
}

/// Borra la noticia, su media y todos los archivos referenciados.
/// Con un id inexistente devuelve NotFound sin tocar el disco.
pub async fn delete_article(
    pool: &DbPool,
    files: &FileStore,
    news_id: i32,
) -> Result<(), ApiError> {
    // LEFT JOIN: una noticia sin media (estado inconsistente) también se borra
    let row: Option<(Option<Vec<String>>, Option<Vec<String>>)> = sqlx::query_as(
        "SELECT m.images, m.videos FROM news n \
         LEFT JOIN media m ON m.news_id = n.id WHERE n.id = $1",
    )
    .bind(news_id)
    .fetch_optional(pool)
    .await?;

    let Some((images, videos)) = row else {
        return Err(ApiError::NotFound("News not found"));
    };

    // Primero media, después news, por la clave foránea
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM media WHERE news_id = $1")
        .bind(news_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM news WHERE id = $1")
        .bind(news_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    files.schedule_delete(images.unwrap_or_default());
    files.schedule_delete(videos.unwrap_or_default());

    Ok(())
}
