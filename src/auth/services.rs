use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::{error, info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        password::{hash_password, verify_password},
        repo::{CreateUserError, UserRepo},
        repo_types::User,
    },
    error::ApiError,
};

pub const SESSION_COOKIE: &str = "token";

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Expired, empty session cookie. Path must match the one that was set.
pub fn session_cookie_removal() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// Creates the account. Expects an already validated request.
pub async fn register_user(users: &dyn UserRepo, req: RegisterRequest) -> Result<User, ApiError> {
    if users.find_by_email(&req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let hash = hash_password(&req.password)?;
    // A concurrent registration can still win between the lookup and the insert
    let user = match users.create(&req.name, &req.email, &hash).await {
        Ok(u) => u,
        Err(CreateUserError::EmailTaken) => {
            warn!(email = %req.email, "email registered concurrently");
            return Err(ApiError::EmailTaken);
        }
        Err(CreateUserError::Other(e)) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::Internal(e));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

pub async fn authenticate(users: &dyn UserRepo, req: LoginRequest) -> Result<User, ApiError> {
    let Some(user) = users.find_by_email(&req.email).await? else {
        warn!(email = %req.email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(email = %req.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}
