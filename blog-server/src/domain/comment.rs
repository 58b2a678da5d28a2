use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::post::validate_positive_i64;
use super::validation::{FieldErrors, required};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) owner_id: i64,
    pub(crate) owner_username: String,
    pub(crate) content: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl Comment {
    pub(crate) fn new(
        id: i64,
        post_id: i64,
        owner_id: i64,
        owner_username: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut errors = FieldErrors::new();
        validate_positive_i64(&mut errors, "id", id);
        validate_positive_i64(&mut errors, "post_id", post_id);
        validate_positive_i64(&mut errors, "owner_id", owner_id);
        errors.into_result()?;

        Ok(Self {
            id,
            post_id,
            owner_id,
            owner_username: owner_username.into(),
            content: content.into(),
            created_at,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CommentRequest {
    pub(crate) content: String,
}

impl CommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let mut errors = FieldErrors::new();
        let content = required(&mut errors, "content", &self.content);
        errors.into_result()?;
        Ok(Self { content })
    }
}
