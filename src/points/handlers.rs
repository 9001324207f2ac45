use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{auth::jwt::AuthUser, error::ApiError, state::AppState, users::User};

use super::dto::{AddPointsRequest, AddPointsResponse, PointsResponse};

pub fn points_routes() -> Router<AppState> {
    Router::new()
        .route("/points", get(get_points))
        .route("/points/add", post(add_points))
}

#[instrument(skip(state))]
pub async fn get_points(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
) -> Result<Json<PointsResponse>, ApiError> {
    let points = User::points(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    Ok(Json(PointsResponse { points }))
}

#[instrument(skip(state, payload))]
pub async fn add_points(
    State(state): State<AppState>,
    AuthUser(email): AuthUser,
    Json(payload): Json<AddPointsRequest>,
) -> Result<Json<AddPointsResponse>, ApiError> {
    let Some(amount) = payload.amount() else {
        warn!(points = %payload.points, "rejected invalid points amount");
        return Err(ApiError::Validation(
            "points must be a positive number".into(),
        ));
    };

    // single-statement increment, concurrent adds cannot lose updates
    let points = User::add_points(&state.db, &email, amount)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    info!(%email, added = amount, balance = points, "points added");
    Ok(Json(AddPointsResponse {
        message: "points added successfully".into(),
        points,
    }))
}
