use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, SignupRequest, SignupResponse},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let (email, password) = match (payload.email.as_deref(), payload.password.as_deref()) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e.trim().to_lowercase(), p),
        _ => {
            warn!("signup missing email or password");
            return Err(ApiError::validation("Email and password are required"));
        }
    };

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "signup for existing email");
        return Err(ApiError::validation("User already exists"));
    }

    let hash = hash_password(password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Store(e)
    })?;

    let user = User::create(&state.db, payload.name.as_deref(), &email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: PublicUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("Invalid email"));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        ApiError::Store(e)
    })?;

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let access_token = keys.sign_access(claims.sub)?;
    let refresh_token = keys.sign_refresh(claims.sub)?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "token references missing user");
            ApiError::not_found("User not found")
        })?;

    Ok(Json(PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn email_regex_rejects_junk() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("spaces in@example.com"));
    }
}
