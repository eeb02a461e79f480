use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::database::repository::Document;

const MIN_FIRST_NAME_LEN: usize = 2;
const MIN_LAST_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 7;

/// Stored user document. Carries the bcrypt hash, so it is never rendered
/// directly; responses go through [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub encrypted_password: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Public view of a user, without the credential hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserParams {
    /// Field-level validation; an empty map means the params are acceptable.
    pub fn validate(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        if self.first_name.trim().chars().count() < MIN_FIRST_NAME_LEN {
            errors.insert(
                "first_name".to_string(),
                format!("first name length should be at least {} characters", MIN_FIRST_NAME_LEN),
            );
        }
        if self.last_name.trim().chars().count() < MIN_LAST_NAME_LEN {
            errors.insert(
                "last_name".to_string(),
                format!("last name length should be at least {} characters", MIN_LAST_NAME_LEN),
            );
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password".to_string(),
                format!("password length should be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        if !is_valid_email(&self.email) {
            errors.insert("email".to_string(), format!("email '{}' is invalid", self.email));
        }
        errors
    }
}

impl User {
    /// Build a new user from registration params, hashing the password with
    /// the given bcrypt cost. Params are expected to be validated already.
    pub fn from_params(params: CreateUserParams, cost: u32) -> Result<Self, bcrypt::BcryptError> {
        let encrypted_password = bcrypt::hash(&params.password, cost)?;
        Ok(Self {
            id: Uuid::new_v4(),
            first_name: params.first_name.trim().to_string(),
            last_name: params.last_name.trim().to_string(),
            email: normalize_email(&params.email),
            encrypted_password,
            is_admin: false,
        })
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}
