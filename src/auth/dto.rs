use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::validation::{is_valid_email, ValidationErrors};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl RegisterRequest {
    /// Trims the name, normalizes the email and checks every field.
    pub fn validate(self) -> Result<RegisterRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = self.name.trim().to_string();
        let email = normalize_email(&self.email);

        if name.chars().count() < 2 {
            errors.add("name", "Name must contain at least 2 characters");
        }
        if !is_valid_email(&email) {
            errors.add("email", "Invalid email");
        }
        if self.password.chars().count() < 6 {
            errors.add("password", "Password must contain at least 6 characters");
        }

        errors.finish(RegisterRequest {
            name,
            email,
            password: self.password,
        })
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<LoginRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let email = normalize_email(&self.email);

        if !is_valid_email(&email) {
            errors.add("email", "Invalid email");
        }
        if self.password.is_empty() {
            errors.add("password", "Required");
        }

        errors.finish(LoginRequest {
            email,
            password: self.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_normalizes_name_and_email() {
        let req = RegisterRequest {
            name: "  Ana Souza ".into(),
            email: " Ana@Example.COM ".into(),
            password: "secret1".into(),
        }
        .validate()
        .expect("valid");
        assert_eq!(req.name, "Ana Souza");
        assert_eq!(req.email, "ana@example.com");
    }

    #[test]
    fn register_reports_every_bad_field() {
        let errors = RegisterRequest {
            name: "A".into(),
            email: "nope".into(),
            password: "12345".into(),
        }
        .validate()
        .unwrap_err();
        assert!(errors.field_errors.contains_key("name"));
        assert!(errors.field_errors.contains_key("email"));
        assert!(errors.field_errors.contains_key("password"));
    }

    #[test]
    fn missing_fields_deserialize_and_fail_validation() {
        let req: LoginRequest = serde_json::from_str("{}").unwrap();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.field_errors["password"], vec!["Required".to_string()]);
    }

    #[test]
    fn public_user_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: time::OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&PublicUser::from(user.clone())).unwrap();
        assert!(json.contains("ana@example.com"));
        assert!(!json.contains("argon2"));

        let raw = serde_json::to_string(&user).unwrap();
        assert!(!raw.contains("password_hash"));
    }
}
