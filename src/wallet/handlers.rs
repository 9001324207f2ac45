use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{dto::MessageResponse, jwt::AuthUser},
    error::ApiError,
    state::AppState,
    users::User,
};

use super::dto::{SaveWalletRequest, WalletResponse};

pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/wallet", get(get_wallet))
        .route("/wallet", post(save_wallet))
}

#[instrument(skip(state))]
pub async fn get_wallet(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> Result<Json<WalletResponse>, ApiError> {
    let wallet = User::wallet(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(WalletResponse { wallet }))
}

#[instrument(skip(state, payload))]
pub async fn save_wallet(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Json(payload): Json<SaveWalletRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let address = payload.wallet.trim();
    if address.is_empty() {
        warn!("rejected empty wallet address");
        return Err(ApiError::Validation("wallet address is required".into()));
    }

    if !User::save_wallet(&state.db, &email, address).await? {
        return Err(ApiError::NotFound("user not found".into()));
    }

    info!(%email, "wallet address saved");
    Ok(Json(MessageResponse::new("wallet saved successfully")))
}
