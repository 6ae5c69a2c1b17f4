use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    models::category::{Category, CategoryPayload},
    query::Page,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CategoryListParams {
    #[serde(rename = "pageNumber")]
    pub page_number: Option<String>,
    pub keyword: Option<String>,
}

// POST /api/category
pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Response {
    let result: Result<Category, sqlx::Error> =
        sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id, name, created_at")
            .bind(&payload.name)
            .fetch_one(&state.pool)
            .await;

    match result {
        Ok(category) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Category created successfully",
                "data": category,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error creando categoría: {e:?}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Error creating category" })),
            )
                .into_response()
        }
    }
}

// GET /api/category — paginado, con búsqueda por nombre
pub async fn list_categories_handler(
    State(state): State<AppState>,
    Query(params): Query<CategoryListParams>,
) -> Response {
    let page = Page::new(
        params.page_number.as_deref(),
        state.config.page_size_categories,
    );
    // Sin keyword el patrón %% trae todas
    let pattern = format!("%{}%", params.keyword.as_deref().unwrap_or(""));

    let result = async {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE name ILIKE $1")
            .bind(&pattern)
            .fetch_one(&state.pool)
            .await?;

        let categories: Vec<Category> = sqlx::query_as(
            "SELECT id, name, created_at FROM categories WHERE name ILIKE $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(page.size)
        .bind(page.offset())
        .fetch_all(&state.pool)
        .await?;

        Ok::<_, sqlx::Error>((total, categories))
    }
    .await;

    match result {
        Ok((total, categories)) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Category fetched successfully",
                "meta": { "page": page.number, "pages": page.pages(total), "total": total },
                "data": categories,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error listando categorías: {e:?}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Error fetching categories" })),
            )
                .into_response()
        }
    }
}

// PUT /api/category/:id
pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryPayload>,
) -> Response {
    let result: Result<Option<Category>, sqlx::Error> =
        sqlx::query_as("UPDATE categories SET name = $1 WHERE id = $2 RETURNING id, name, created_at")
            .bind(&payload.name)
            .bind(id)
            .fetch_optional(&state.pool)
            .await;

    match result {
        Ok(Some(category)) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Category updated successfully",
                "data": category,
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Category not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error actualizando categoría {id}: {e:?}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Error updating category" })),
            )
                .into_response()
        }
    }
}

// DELETE /api/category/:id
// Una categoría con noticias asignadas no se borra: primero hay que reasignarlas.
pub async fn delete_category_handler(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    let in_use: i64 = match sqlx::query_scalar("SELECT COUNT(*) FROM news WHERE category_id = $1")
        .bind(id)
        .fetch_one(&state.pool)
        .await
    {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("Error comprobando uso de categoría {id}: {e:?}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Error deleting category" })),
            )
                .into_response();
        }
    };

    if in_use > 0 {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "success": false, "message": "Category still has news assigned" })),
        )
            .into_response();
    }

    let result: Result<Option<Category>, sqlx::Error> =
        sqlx::query_as("DELETE FROM categories WHERE id = $1 RETURNING id, name, created_at")
            .bind(id)
            .fetch_optional(&state.pool)
            .await;

    match result {
        Ok(Some(category)) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "message": "Category deleted successfully",
                "data": category,
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Category not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error eliminando categoría {id}: {e:?}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Error deleting category" })),
            )
                .into_response()
        }
    }
}
