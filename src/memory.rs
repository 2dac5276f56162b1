//! In-memory repositories for tests.

use axum::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{
    repo::{CreateUserError, UserRepo},
    repo_types::User,
};
use crate::meals::{
    repo::MealRepo,
    repo_types::{Meal, MealChanges, NewMeal},
};

#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User, CreateUserError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(CreateUserError::EmailTaken);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// Mirrors the `COALESCE` update of the Postgres store.
fn apply_changes(changes: MealChanges, meal: &mut Meal) {
    if let Some(name) = changes.name {
        meal.name = name;
    }
    if let Some(description) = changes.description {
        meal.description = Some(description);
    }
    if let Some(date_time) = changes.date_time {
        meal.date_time = date_time;
    }
    if let Some(in_diet) = changes.in_diet {
        meal.in_diet = in_diet;
    }
}

/// Insertion order stands in for `created_at` when timestamps tie.
#[derive(Default)]
pub struct MemoryMealRepo {
    meals: RwLock<Vec<Meal>>,
}

impl MemoryMealRepo {
    async fn owned_sorted(&self, user_id: Uuid) -> Vec<Meal> {
        let meals = self.meals.read().await;
        let mut owned: Vec<Meal> = meals.iter().filter(|m| m.user_id == user_id).cloned().collect();
        owned.sort_by_key(|m| m.date_time);
        owned
    }
}

#[async_trait]
impl MealRepo for MemoryMealRepo {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let mut owned = self.owned_sorted(user_id).await;
        owned.reverse();
        Ok(owned)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meals = self.meals.read().await;
        Ok(meals
            .iter()
            .find(|m| m.id == id && m.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: Uuid, meal: NewMeal) -> anyhow::Result<Meal> {
        let now = OffsetDateTime::now_utc();
        let meal = Meal {
            id: Uuid::new_v4(),
            user_id,
            name: meal.name,
            description: meal.description,
            date_time: meal.date_time,
            in_diet: meal.in_diet,
            created_at: now,
            updated_at: now,
        };
        self.meals.write().await.push(meal.clone());
        Ok(meal)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, changes: MealChanges) -> anyhow::Result<Option<Meal>> {
        let mut meals = self.meals.write().await;
        let Some(meal) = meals.iter_mut().find(|m| m.id == id && m.user_id == user_id) else {
            return Ok(None);
        };
        apply_changes(changes, meal);
        meal.updated_at = OffsetDateTime::now_utc();
        Ok(Some(meal.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut meals = self.meals.write().await;
        let before = meals.len();
        meals.retain(|m| !(m.id == id && m.user_id == user_id));
        Ok(meals.len() < before)
    }

    async fn diet_flags(&self, user_id: Uuid) -> anyhow::Result<Vec<bool>> {
        Ok(self
            .owned_sorted(user_id)
            .await
            .into_iter()
            .map(|m| m.in_diet)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn new_meal(at: OffsetDateTime, in_diet: bool) -> NewMeal {
        NewMeal {
            name: "meal".into(),
            description: None,
            date_time: at,
            in_diet,
        }
    }

    #[tokio::test]
    async fn diet_flags_follow_meal_time_with_stable_ties() {
        let repo = MemoryMealRepo::default();
        let user = Uuid::new_v4();
        repo.create(user, new_meal(datetime!(2024-01-03 08:00 UTC), false)).await.unwrap();
        repo.create(user, new_meal(datetime!(2024-01-01 08:00 UTC), true)).await.unwrap();
        repo.create(user, new_meal(datetime!(2024-01-02 08:00 UTC), true)).await.unwrap();
        repo.create(user, new_meal(datetime!(2024-01-02 08:00 UTC), false)).await.unwrap();

        assert_eq!(repo.diet_flags(user).await.unwrap(), vec![true, true, false, false]);
        assert!(repo.diet_flags(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let repo = MemoryMealRepo::default();
        let user = Uuid::new_v4();
        repo.create(user, new_meal(datetime!(2024-01-01 08:00 UTC), true)).await.unwrap();
        repo.create(user, new_meal(datetime!(2024-02-01 08:00 UTC), true)).await.unwrap();

        let listed = repo.list_by_user(user).await.unwrap();
        assert_eq!(listed[0].date_time, datetime!(2024-02-01 08:00 UTC));
    }

    #[tokio::test]
    async fn foreign_meals_cannot_be_touched() {
        let repo = MemoryMealRepo::default();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let meal = repo
            .create(owner, new_meal(datetime!(2024-01-01 08:00 UTC), true))
            .await
            .unwrap();

        assert!(repo.find(other, meal.id).await.unwrap().is_none());
        assert!(repo.update(other, meal.id, MealChanges::default()).await.unwrap().is_none());
        assert!(!repo.delete(other, meal.id).await.unwrap());
        assert!(repo.find(owner, meal.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let repo = MemoryMealRepo::default();
        let user = Uuid::new_v4();
        let mut first = new_meal(datetime!(2024-01-01 08:00 UTC), true);
        first.description = Some("oats".into());
        let meal = repo.create(user, first).await.unwrap();

        let changes = MealChanges {
            in_diet: Some(false),
            ..Default::default()
        };
        let updated = repo.update(user, meal.id, changes).await.unwrap().unwrap();
        assert!(!updated.in_diet);
        assert_eq!(updated.name, "meal");
        assert_eq!(updated.description.as_deref(), Some("oats"));
        assert_eq!(updated.date_time, meal.date_time);
    }

    #[tokio::test]
    async fn duplicate_email_insert_is_typed() {
        let repo = MemoryUserRepo::default();
        repo.create("Ana", "ana@example.com", "hash").await.unwrap();
        let err = repo.create("Ana", "ana@example.com", "hash").await.unwrap_err();
        assert!(matches!(err, CreateUserError::EmailTaken));
    }
}
