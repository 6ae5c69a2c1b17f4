use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::db::DbPool;
use crate::models::news::{Article, ArticleRow};

/// Columnas del JOIN noticia + categoría + media.
const SELECT_ARTICLE: &str = "SELECT n.id, n.title, n.content, n.author, n.province, n.tags, \
     n.category_id, n.created_at, \
     c.name AS category_name, c.created_at AS category_created_at, \
     m.id AS media_id, m.images, m.videos \
     FROM news n \
     JOIN categories c ON c.id = n.category_id \
     JOIN media m ON m.news_id = n.id";

// El COUNT no necesita el JOIN con media
const COUNT_ARTICLES: &str =
    "SELECT COUNT(*) FROM news n JOIN categories c ON c.id = n.category_id";

/// Filtros de listado. Todos opcionales; los presentes se combinan con AND.
#[derive(Debug, Default, Clone)]
pub struct NewsFilter {
    /// Subcadena sobre título O contenido, sin distinguir mayúsculas
    pub keyword: Option<String>,
    /// Igualdad exacta contra el nombre de la categoría
    pub category_name: Option<String>,
    /// Subcadena sobre provincia, sin distinguir mayúsculas
    pub province: Option<String>,
    /// Rango cerrado sobre created_at
    pub created_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl NewsFilter {
    fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = " WHERE ";

        if let Some(keyword) = &self.keyword {
            let pattern = format!("%{keyword}%");
            qb.push(sep)
                .push("(n.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR n.content ILIKE ")
                .push_bind(pattern)
                .push(")");
            sep = " AND ";
        }

        if let Some(name) = &self.category_name {
            qb.push(sep).push("c.name = ").push_bind(name.clone());
            sep = " AND ";
        }

        if let Some(province) = &self.province {
            qb.push(sep)
                .push("n.province ILIKE ")
                .push_bind(format!("%{province}%"));
            sep = " AND ";
        }

        if let Some((from, to)) = &self.created_between {
            qb.push(sep)
                .push("n.created_at BETWEEN ")
                .push_bind(*from)
                .push(" AND ")
                .push_bind(*to);
        }
    }
}

/// Página pedida por el cliente. `pageNumber` llega como texto:
/// cualquier cosa no numérica o menor a 1 vale 1.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    pub fn new(raw_number: Option<&str>, size: i64) -> Self {
        let number = raw_number
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(1);
        Self { number, size }
    }

    pub fn offset(&self) -> i64 {
        self.size * (self.number - 1)
    }

    /// Total de páginas, redondeando hacia arriba.
    pub fn pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.size - 1) / self.size
        }
    }
}

pub async fn count_articles(pool: &DbPool, filter: &NewsFilter) -> sqlx::Result<i64> {
    let mut qb = QueryBuilder::new(COUNT_ARTICLES);
    filter.apply(&mut qb);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

pub async fn fetch_articles(
    pool: &DbPool,
    filter: &NewsFilter,
    page: &Page,
) -> sqlx::Result<Vec<Article>> {
    let mut qb = QueryBuilder::new(SELECT_ARTICLE);
    filter.apply(&mut qb);
    qb.push(" ORDER BY n.created_at DESC LIMIT ")
        .push_bind(page.size)
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows: Vec<ArticleRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Article::from).collect())
}

pub async fn fetch_article(pool: &DbPool, news_id: i32) -> sqlx::Result<Option<Article>> {
    let mut qb = QueryBuilder::new(SELECT_ARTICLE);
    qb.push(" WHERE n.id = ").push_bind(news_id);

    let row: Option<ArticleRow> = qb.build_query_as().fetch_optional(pool).await?;
    Ok(row.map(Article::from))
}

/// Noticias de la misma categoría, excluyendo la consultada.
pub async fn fetch_similar(
    pool: &DbPool,
    news_id: i32,
    category_id: i32,
    limit: i64,
) -> sqlx::Result<Vec<Article>> {
    let mut qb = QueryBuilder::new(SELECT_ARTICLE);
    qb.push(" WHERE n.category_id = ")
        .push_bind(category_id)
        .push(" AND n.id <> ")
        .push_bind(news_id)
        .push(" ORDER BY n.created_at DESC LIMIT ")
        .push_bind(limit);

    let rows: Vec<ArticleRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Article::from).collect())
}

/// Interpreta fechas RFC 3339 o `YYYY-MM-DD` (como medianoche UTC);
/// lo demás cuenta como ausente.
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let date: NaiveDate = raw.trim().parse().ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("hora válida")
        .and_utc()
}

fn end_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("hora válida")
        .and_utc()
}

/// Rango de fechas según qué parámetros lleguen:
/// solo `fromDate` => [from, fin de hoy]; solo `toDate` => ese día completo;
/// ambos => [from, to]; inválidos o ausentes => sin filtro.
pub fn date_range(
    from: Option<&str>,
    to: Option<&str>,
    now: DateTime<Utc>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let from = from.and_then(parse_datetime);
    let to = to.and_then(parse_datetime);

    match (from, to) {
        (Some(from), Some(to)) => Some((from, to)),
        (Some(from), None) => Some((from, end_of_day(now))),
        (None, Some(to)) => Some((start_of_day(to), end_of_day(to))),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn page_tolera_valores_basura() {
        assert_eq!(Page::new(Some("2"), 30).number, 2);
        assert_eq!(Page::new(Some(" 3 "), 30).number, 3);
        assert_eq!(Page::new(Some("abc"), 30).number, 1);
        assert_eq!(Page::new(Some("0"), 30).number, 1);
        assert_eq!(Page::new(Some("-5"), 30).number, 1);
        assert_eq!(Page::new(None, 30).number, 1);
    }

    #[test]
    fn paginacion_calcula_offset_y_paginas() {
        let page = Page::new(Some("2"), 30);
        assert_eq!(page.offset(), 30);
        // 45 resultados con páginas de 30 => 2 páginas
        assert_eq!(page.pages(45), 2);
        assert_eq!(page.pages(60), 2);
        assert_eq!(page.pages(61), 3);
        assert_eq!(page.pages(0), 0);

        let page = Page::new(Some("1"), 8);
        assert_eq!(page.offset(), 0);
        assert_eq!(page.pages(8), 1);
        assert_eq!(page.pages(9), 2);
    }

    #[test]
    fn filtros_presentes_se_combinan_con_and() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let filter = NewsFilter {
            keyword: Some("election".into()),
            category_name: Some("politics".into()),
            province: Some("bagmati".into()),
            created_between: Some((from, to)),
        };

        let mut qb = QueryBuilder::new(COUNT_ARTICLES);
        filter.apply(&mut qb);
        let sql = qb.sql();

        assert!(sql.contains("n.title ILIKE $1"));
        assert!(sql.contains("OR n.content ILIKE $2"));
        assert!(sql.contains("AND c.name = $3"));
        assert!(sql.contains("AND n.province ILIKE $4"));
        assert!(sql.contains("AND n.created_at BETWEEN $5 AND $6"));
    }

    #[test]
    fn sin_filtros_no_hay_where() {
        let mut qb = QueryBuilder::new(COUNT_ARTICLES);
        NewsFilter::default().apply(&mut qb);
        assert!(!qb.sql().contains("WHERE"));
    }

    #[test]
    fn solo_from_llega_hasta_el_fin_de_hoy() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 10, 15, 0).unwrap();
        let (from, to) = date_range(Some("2024-01-10"), None, now).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        assert_eq!(to.date_naive(), now.date_naive());
        assert_eq!(to.format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn solo_to_cubre_ese_dia_completo() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 10, 15, 0).unwrap();
        let (from, to) = date_range(None, Some("2024-01-10"), now).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap());
        assert_eq!(to.date_naive(), from.date_naive());
        assert_eq!(to.format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn ambas_fechas_se_usan_tal_cual() {
        let now = Utc::now();
        let (from, to) =
            date_range(Some("2024-01-01"), Some("2024-02-01T12:00:00Z"), now).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn fechas_invalidas_cuentan_como_ausentes() {
        let now = Utc::now();
        assert!(date_range(Some("no-es-fecha"), None, now).is_none());
        assert!(date_range(None, Some("2024-13-45"), now).is_none());
        assert!(date_range(None, None, now).is_none());

        // from inválido pero to válido: vale la regla de "solo to"
        let (from, to) = date_range(Some("basura"), Some("2024-01-10"), now).unwrap();
        assert_eq!(from.date_naive(), to.date_naive());
    }
}
