use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::{error::ApiError, state::AppState, users::User};

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/points/:email", get(get_points_by_email))
}

#[derive(Debug, Serialize)]
pub struct AdminPointsResponse {
    pub email: String,
    pub points: f64,
}

/// Debug lookup by email, no bearer token. Only reachable from the host the
/// server runs on; any other peer gets 403.
#[instrument(skip(state))]
pub async fn get_points_by_email(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(email): Path<String>,
) -> Result<Json<AdminPointsResponse>, ApiError> {
    if !addr.ip().is_loopback() {
        warn!(peer = %addr, "admin endpoint hit from non-loopback address");
        return Err(ApiError::Forbidden);
    }

    let points = User::points(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(AdminPointsResponse { email, points }))
}
