use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ForgotPasswordRequest, LoginRequest, MessageResponse, ResetPasswordRequest,
            SignupRequest, SignupResponse,
        },
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        reset::{
            generate_reset_token, reset_email_html, reset_email_text, reset_link, RESET_TOKEN_TTL,
        },
    },
    error::ApiError,
    state::AppState,
    users::User,
};

use super::dto::LoginResponse;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    payload.email = payload.email.trim().to_string();

    if payload.email.is_empty() || payload.password.is_empty() {
        warn!("signup with missing email or password");
        return Err(ApiError::Validation(
            "email and password are required".into(),
        ));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("invalid email".into()));
    }

    let hash = hash_password(&payload.password)?;

    let user = match User::create(&state.db, &payload.email, &hash).await {
        Ok(u) => u,
        // Duplicate emails surface as a unique violation from the insert
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            warn!(email = %payload.email, "email already registered");
            return Err(ApiError::Conflict);
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::Internal(e.into()));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "user created successfully".into(),
            user_id: user.id,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    payload.email = payload.email.trim().to_string();

    // Unknown email and wrong password return the same message, so callers
    // cannot probe which accounts exist.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("invalid email or password".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, "login invalid password");
        return Err(ApiError::Unauthorized("invalid email or password".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        token,
        points: user.points,
    }))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(mut payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    payload.email = payload.email.trim().to_string();

    if payload.email.is_empty() {
        return Err(ApiError::Validation("email is required".into()));
    }

    // The response is identical whether or not the account exists.
    let generic =
        MessageResponse::new("if that email is registered, a reset link has been sent");

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        info!("forgot-password for unknown email");
        return Ok(Json(generic));
    };

    let token = generate_reset_token();
    let expires = OffsetDateTime::now_utc() + RESET_TOKEN_TTL;
    User::set_reset_token(&state.db, &user.email, &token, expires).await?;

    let link = reset_link(&state.config.smtp.reset_base_url, &token);
    // The persisted token is not rolled back when the send fails
    if let Err(e) = state
        .mailer
        .send(
            &user.email,
            "Reset your password",
            reset_email_text(&link),
            reset_email_html(&link),
        )
        .await
    {
        error!(error = %e, email = %user.email, "reset email send failed");
        return Err(ApiError::Internal(e));
    }

    info!(user_id = %user.id, "reset email sent");
    Ok(Json(generic))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.token.is_empty() {
        return Err(ApiError::Validation("token is required".into()));
    }
    if payload.new_password.is_empty() {
        return Err(ApiError::Validation("new password is required".into()));
    }

    let hash = hash_password(&payload.new_password)?;

    // One conditional UPDATE both checks expiry and clears the token, so a
    // token can never be consumed twice.
    if !User::consume_reset_token(&state.db, &payload.token, &hash).await? {
        warn!("reset with invalid or expired token");
        return Err(ApiError::InvalidToken);
    }

    info!("password reset completed");
    Ok(Json(MessageResponse::new("password has been reset")))
}
