use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::{category::Category, media::Media};

/// Fila plana que devuelve el JOIN news + categories + media.
#[derive(Debug, FromRow)]
pub struct ArticleRow {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub province: String,
    pub tags: Vec<String>,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub category_name: String,
    pub category_created_at: DateTime<Utc>,
    pub media_id: i32,
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

/// Noticia con su categoría y su media anidadas, tal como la espera el cliente.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author: String,
    pub province: String,
    pub tags: Vec<String>,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub category: Category,
    pub media: Media,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            category: Category {
                id: row.category_id,
                name: row.category_name,
                created_at: row.category_created_at,
            },
            media: Media {
                id: row.media_id,
                images: row.images,
                videos: row.videos,
                news_id: row.id,
            },
            id: row.id,
            title: row.title,
            content: row.content,
            author: row.author,
            province: row.province,
            tags: row.tags,
            category_id: row.category_id,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn article_anida_categoria_y_media() {
        let created = Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap();
        let row = ArticleRow {
            id: 4,
            title: "Resultados electorales".into(),
            content: "...".into(),
            author: "redacción".into(),
            province: "Bagmati".into(),
            tags: vec!["elecciones".into()],
            category_id: 2,
            created_at: created,
            category_name: "politics".into(),
            category_created_at: created,
            media_id: 9,
            images: vec!["uploads/a.jpg".into()],
            videos: vec![],
        };

        let article = Article::from(row);
        assert_eq!(article.category.id, article.category_id);
        assert_eq!(article.media.news_id, article.id);
        assert_eq!(article.media.images, vec!["uploads/a.jpg".to_string()]);
    }
}
