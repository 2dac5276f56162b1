use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use crate::{
    auth::extractors::AuthUser, error::ApiError, metrics::aggregator::Metrics, state::AppState,
};

pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(get_metrics))
}

#[instrument(skip(state))]
pub async fn get_metrics(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Metrics>, ApiError> {
    let flags = state.meals.diet_flags(user_id).await?;
    let metrics = Metrics::from_flags(flags);
    debug!(
        %user_id,
        total = metrics.total,
        best_streak = metrics.best_streak,
        "metrics computed"
    );
    Ok(Json(metrics))
}
