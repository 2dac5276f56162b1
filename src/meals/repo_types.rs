use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub date_time: OffsetDateTime,
    pub in_diet: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated input for a new meal.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub description: Option<String>,
    pub date_time: OffsetDateTime,
    pub in_diet: bool,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct MealChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub date_time: Option<OffsetDateTime>,
    pub in_diet: Option<bool>,
}
