use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;

use crate::{
    error::ApiError,
    models::user::{LoginPayload, User, UserInfo},
    state::AppState,
    utils::{jwt, security},
};

const SESSION_COOKIE: &str = "jwt";

// POST /api/user/login
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Buscar usuario por email
    let user: Option<User> =
        sqlx::query_as("SELECT id, username, email, password, role FROM users WHERE email = $1")
            .bind(&payload.email)
            .fetch_optional(&state.pool)
            .await?;

    // Usuario inexistente y contraseña mala responden igual
    let Some(user) = user else {
        return Err(ApiError::Unauthorized("Invalid email or password"));
    };
    if !security::verify_password(&payload.password, &user.password) {
        return Err(ApiError::Unauthorized("Invalid email or password"));
    }

    // 2. Firmar el token de sesión y dejarlo también como cookie
    let token = jwt::create_token(&state.config.jwt_secret, user.id, &user.role).map_err(|e| {
        tracing::error!("Error firmando token: {e:?}");
        ApiError::Internal("no se pudo firmar el token")
    })?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .build();

    Ok((
        jar.add(cookie),
        Json(json!({
            "token": token,
            "userInfo": UserInfo {
                id: user.id,
                username: user.username,
                email: user.email,
                role: user.role,
            },
        })),
    ))
}

// GET /api/user/logout — sin estado en el servidor: basta con soltar la cookie
pub async fn logout_handler(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, Json(json!({ "message": "signout success" })))
}

// GET /api/user — el hash nunca se serializa (ver el modelo)
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users: Vec<User> =
        sqlx::query_as("SELECT id, username, email, password, role FROM users ORDER BY id ASC")
            .fetch_all(&state.pool)
            .await?;

    Ok(Json(users))
}
