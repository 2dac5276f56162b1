use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::meals::repo_types::{Meal, MealChanges, NewMeal};

/// Meal storage. Every query is scoped to the owning user.
#[async_trait]
pub trait MealRepo: Send + Sync {
    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;
    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>>;
    async fn create(&self, user_id: Uuid, meal: NewMeal) -> anyhow::Result<Meal>;
    async fn update(&self, user_id: Uuid, id: Uuid, changes: MealChanges) -> anyhow::Result<Option<Meal>>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
    /// `in_diet` of every meal, oldest `date_time` first. Ties keep creation order.
    async fn diet_flags(&self, user_id: Uuid) -> anyhow::Result<Vec<bool>>;
}

#[derive(Clone)]
pub struct PgMealRepo {
    db: PgPool,
}

impl PgMealRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealRepo for PgMealRepo {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, date_time, in_diet, created_at, updated_at
            FROM meals
            WHERE user_id = $1
            ORDER BY date_time DESC, created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list meals")?;
        Ok(rows)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, date_time, in_diet, created_at, updated_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("select meal")?;
        Ok(meal)
    }

    async fn create(&self, user_id: Uuid, meal: NewMeal) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, user_id, name, description, date_time, in_diet)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, description, date_time, in_diet, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(meal.name)
        .bind(meal.description)
        .bind(meal.date_time)
        .bind(meal.in_diet)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(meal)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, changes: MealChanges) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals
            SET name        = COALESCE($3, name),
                description = COALESCE($4, description),
                date_time   = COALESCE($5, date_time),
                in_diet     = COALESCE($6, in_diet),
                updated_at  = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, date_time, in_diet, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.date_time)
        .bind(changes.in_diet)
        .fetch_optional(&self.db)
        .await
        .context("update meal")?;
        Ok(meal)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM meals WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(res.rows_affected() > 0)
    }

    async fn diet_flags(&self, user_id: Uuid) -> anyhow::Result<Vec<bool>> {
        let flags = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT in_diet
            FROM meals
            WHERE user_id = $1
            ORDER BY date_time ASC, created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("select diet flags")?;
        Ok(flags)
    }
}
