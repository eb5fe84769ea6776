use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{
    error::{AppError, AppResult},
    models::deserialize_some,
};

/// A stored quote. `is_favorite` is computed per request for the viewing user
/// and is never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, FromRow)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub source: Option<String>,
    pub category: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub is_favorite: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewQuote {
    pub text: String,
    pub author: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewQuote {
    pub fn validate(&self) -> AppResult<()> {
        ensure_not_blank("text", &self.text)?;
        ensure_not_blank("author", &self.author)?;
        Ok(())
    }
}

/// Partial update of a quote. `source` and `category` accept `null` to clear.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuotePatch {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub source: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category: Option<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteChange {
    Text(String),
    Author(String),
    Source(Option<String>),
    Category(Option<String>),
}

impl QuoteChange {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Author(_) => "author",
            Self::Source(_) => "source",
            Self::Category(_) => "category",
        }
    }
}

impl QuotePatch {
    pub fn into_changes(self) -> AppResult<Vec<QuoteChange>> {
        let mut changes = Vec::with_capacity(4);

        if let Some(text) = self.text {
            ensure_not_blank("text", &text)?;
            changes.push(QuoteChange::Text(text));
        }
        if let Some(author) = self.author {
            ensure_not_blank("author", &author)?;
            changes.push(QuoteChange::Author(author));
        }
        if let Some(source) = self.source {
            changes.push(QuoteChange::Source(source));
        }
        if let Some(category) = self.category {
            changes.push(QuoteChange::Category(category));
        }

        if changes.is_empty() {
            return Err(AppError::validation("no valid fields to update"));
        }

        Ok(changes)
    }
}

/// Listing filter: optional category equality and the user whose favorites
/// annotate the result.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuoteFilter {
    pub category: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ViewerParams {
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FavoriteRequest {
    pub user_id: String,
}

pub fn validate_user_id(user_id: &str) -> AppResult<()> {
    ensure_not_blank("user_id", user_id)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FavoriteStatus {
    pub success: bool,
}

fn ensure_not_blank(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}
