use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::validation::{FieldErrors, max_chars, required};

pub(crate) const TITLE_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) owner_id: i64,
    pub(crate) owner_username: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl Post {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        owner_id: i64,
        owner_username: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut errors = FieldErrors::new();
        validate_positive_i64(&mut errors, "id", id);
        validate_positive_i64(&mut errors, "owner_id", owner_id);
        errors.into_result()?;

        Ok(Self {
            id,
            title: title.into(),
            content: content.into(),
            owner_id,
            owner_username: owner_username.into(),
            created_at,
        })
    }

    pub(crate) fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}

/// Title and content as submitted through the post form; used for both
/// creating and editing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PostRequest {
    pub(crate) title: String,
    pub(crate) content: String,
}

impl PostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let mut errors = FieldErrors::new();

        let title = required(&mut errors, "title", &self.title);
        max_chars(&mut errors, "title", &title, TITLE_MAX_CHARS);
        let content = required(&mut errors, "content", &self.content);

        errors.into_result()?;
        Ok(Self { title, content })
    }
}

pub(super) fn validate_positive_i64(errors: &mut FieldErrors, field: &'static str, value: i64) {
    if value <= 0 {
        errors.add(field, "must be > 0");
    }
}
