use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    meals::dto::{CreateMealRequest, MealResponse, UpdateMealRequest},
    state::AppState,
};

pub fn meals_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MealResponse>>, ApiError> {
    let meals = state.meals.list_by_user(user_id).await?;
    Ok(Json(meals.into_iter().map(MealResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealResponse>, ApiError> {
    let meal = state.meals.find(user_id, id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealResponse>), ApiError> {
    let new_meal = body.validate().map_err(|e| {
        warn!(%user_id, "invalid meal body");
        e
    })?;
    let meal = state.meals.create(user_id, new_meal).await?;
    info!(%user_id, meal_id = %meal.id, in_diet = meal.in_diet, "meal created");
    Ok((StatusCode::CREATED, Json(meal.into())))
}

#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMealRequest>,
) -> Result<Json<MealResponse>, ApiError> {
    let changes = body.validate()?;
    let meal = state
        .meals
        .update(user_id, id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(%user_id, meal_id = %meal.id, "meal updated");
    Ok(Json(meal.into()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.meals.delete(user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    info!(%user_id, meal_id = %id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}
