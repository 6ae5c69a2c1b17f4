use serde::Serialize;

/// Lista de archivos asociada 1:1 a una noticia. Las rutas son relativas
/// a la raíz del proceso (ej: "uploads/<uuid>.jpg").
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i32,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub news_id: i32,
}
