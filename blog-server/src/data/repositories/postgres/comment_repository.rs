use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    owner_id: i64,
    owner_username: String,
    content: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (post_id, owner_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, owner_id, content, created_at
            )
            SELECT
                inserted.id,
                inserted.post_id,
                inserted.owner_id,
                users.username AS owner_username,
                inserted.content,
                inserted.created_at
            FROM inserted
            JOIN users ON users.id = inserted.owner_id
            "#,
        )
        .bind(input.post_id)
        .bind(input.owner_id)
        .bind(&input.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        map_row_to_comment(row)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT
                comments.id,
                comments.post_id,
                comments.owner_id,
                users.username AS owner_username,
                comments.content,
                comments.created_at
            FROM comments
            JOIN users ON users.id = comments.owner_id
            WHERE comments.post_id = $1
            ORDER BY comments.created_at DESC, comments.id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_comment_db_error)?;

        rows.into_iter().map(map_row_to_comment).collect()
    }
}

fn map_row_to_comment(row: CommentRow) -> Result<Comment, DomainError> {
    Comment::new(
        row.id,
        row.post_id,
        row.owner_id,
        row.owner_username,
        row.content,
        row.created_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_comment_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        let resource = match db_err.constraint() {
            Some("comments_owner_id_fkey") => "owner",
            _ => "post",
        };
        return DomainError::NotFound(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}
