use serde::{Deserialize, Deserializer, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime, UtcOffset};
use uuid::Uuid;

use crate::meals::repo_types::{Meal, MealChanges, NewMeal};
use crate::validation::ValidationErrors;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date_time: OffsetDateTime,
    pub in_diet: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Meal> for MealResponse {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            description: m.description,
            date_time: m.date_time,
            in_diet: m.in_diet,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Keeps an explicit JSON `null` apart from an absent key:
/// absent is `None`, `null` is `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST /meals`. Fields are optional here so that a missing one
/// is reported per field instead of as a JSON rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub in_diet: Option<Option<bool>>,
}

/// Body of `PUT /meals/:id`; every field may be omitted but none may be `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub date_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub in_diet: Option<Option<bool>>,
}

/// Unwraps a supplied value; `null` is recorded as an error.
fn supplied<T>(
    value: Option<Option<T>>,
    field: &str,
    expected: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match value {
        Some(Some(v)) => Some(v),
        Some(None) => {
            errors.add(field, format!("Expected {expected}, received null"));
            None
        }
        None => None,
    }
}

/// Like [`supplied`], but an absent key is an error too.
fn required<T>(
    value: Option<Option<T>>,
    field: &str,
    expected: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    if value.is_none() {
        errors.add(field, "Required");
        return None;
    }
    supplied(value, field, expected, errors)
}

fn check_name(name: String, errors: &mut ValidationErrors) -> Option<String> {
    if name.is_empty() {
        errors.add("name", "Name must not be empty");
        None
    } else {
        Some(name)
    }
}

/// Parses an RFC 3339 timestamp and normalizes it to UTC. Timestamps whose
/// UTC equivalent falls outside the supported range are rejected.
fn parse_date_time(raw: &str, errors: &mut ValidationErrors) -> Option<OffsetDateTime> {
    match OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|dt| dt.checked_to_offset(UtcOffset::UTC))
    {
        Some(dt) => Some(dt),
        None => {
            errors.add("dateTime", "Invalid datetime");
            None
        }
    }
}

impl CreateMealRequest {
    pub fn validate(self) -> Result<NewMeal, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required(self.name, "name", "string", &mut errors)
            .and_then(|n| check_name(n, &mut errors));
        let description = supplied(self.description, "description", "string", &mut errors);
        let date_time = required(self.date_time, "dateTime", "string", &mut errors)
            .and_then(|raw| parse_date_time(&raw, &mut errors));
        let in_diet = required(self.in_diet, "inDiet", "boolean", &mut errors);

        match (name, date_time, in_diet) {
            (Some(name), Some(date_time), Some(in_diet)) if errors.is_empty() => Ok(NewMeal {
                name,
                description,
                date_time,
                in_diet,
            }),
            _ => Err(errors),
        }
    }
}

impl UpdateMealRequest {
    pub fn validate(self) -> Result<MealChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = supplied(self.name, "name", "string", &mut errors)
            .and_then(|n| check_name(n, &mut errors));
        let description = supplied(self.description, "description", "string", &mut errors);
        let date_time = supplied(self.date_time, "dateTime", "string", &mut errors)
            .and_then(|raw| parse_date_time(&raw, &mut errors));
        let in_diet = supplied(self.in_diet, "inDiet", "boolean", &mut errors);

        errors.finish(MealChanges {
            name,
            description,
            date_time,
            in_diet,
        })
    }
}
