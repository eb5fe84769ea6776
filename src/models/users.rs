use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{
    error::{AppError, AppResult},
    models::deserialize_some,
};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const AGE_MAX: i64 = 120;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub age: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<i64>,
}

impl NewUser {
    pub fn validate(&self) -> AppResult<()> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        Ok(())
    }
}

/// Partial update of a user. `age: null` clears the stored age.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub age: Option<Option<i64>>,
}

/// A single column assignment of a user update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserChange {
    Email(String),
    Age(Option<i64>),
}

impl UserChange {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Age(_) => "age",
        }
    }
}

impl UserPatch {
    pub fn into_changes(self) -> AppResult<Vec<UserChange>> {
        let mut changes = Vec::with_capacity(2);

        if let Some(email) = self.email {
            validate_email(&email)?;
            changes.push(UserChange::Email(email));
        }

        if let Some(age) = self.age {
            if let Some(age) = age {
                validate_age(age)?;
            }
            changes.push(UserChange::Age(age));
        }

        if changes.is_empty() {
            return Err(AppError::validation("no valid fields to update"));
        }

        Ok(changes)
    }
}

fn validate_username(username: &str) -> AppResult<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AppError::validation(format!(
            "username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && domain.split('.').all(|label| !label.is_empty())
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AppError::validation(format!(
            "\"{email}\" is not a valid email address"
        )));
    }
    Ok(())
}

fn validate_age(age: i64) -> AppResult<()> {
    if !(0..=AGE_MAX).contains(&age) {
        return Err(AppError::validation(format!(
            "age must be between 0 and {AGE_MAX}"
        )));
    }
    Ok(())
}
