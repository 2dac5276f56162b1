use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        services::{authenticate, register_user, session_cookie, session_cookie_removal},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
        .route("/auth/logout", post(logout))
}

fn start_session(state: &AppState, jar: CookieJar, user: &PublicUser) -> Result<CookieJar, ApiError> {
    let token = JwtKeys::from_ref(state).sign(user.id)?;
    Ok(jar.add(session_cookie(token, state.config.is_production())))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<PublicUser>), ApiError> {
    let payload = payload.validate().map_err(|e| {
        warn!(fields = ?e.field_errors.keys().collect::<Vec<_>>(), "invalid register body");
        e
    })?;

    let user = PublicUser::from(register_user(state.users.as_ref(), payload).await?);
    let jar = start_session(&state, jar, &user)?;
    Ok((StatusCode::CREATED, jar, Json(user)))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<PublicUser>), ApiError> {
    let payload = payload.validate()?;
    let user = PublicUser::from(authenticate(state.users.as_ref(), payload).await?);
    let jar = start_session(&state, jar, &user)?;
    Ok((jar, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "token for unknown user");
        ApiError::NotFound
    })?;
    Ok(Json(PublicUser::from(user)))
}

/// Always succeeds, with or without a session.
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (StatusCode, CookieJar) {
    info!("session cleared");
    (StatusCode::NO_CONTENT, jar.add(session_cookie_removal()))
}
