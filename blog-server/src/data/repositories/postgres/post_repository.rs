use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    owner_id: i64,
    owner_username: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH inserted AS (
                INSERT INTO posts (title, content, owner_id)
                VALUES ($1, $2, $3)
                RETURNING id, title, content, owner_id, created_at
            )
            SELECT
                inserted.id,
                inserted.title,
                inserted.content,
                inserted.owner_id,
                users.username AS owner_username,
                inserted.created_at
            FROM inserted
            JOIN users ON users.id = inserted.owner_id
            "#,
        )
        .bind(&input.title)
        .bind(&input.content)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                posts.id,
                posts.title,
                posts.content,
                posts.owner_id,
                users.username AS owner_username,
                posts.created_at
            FROM posts
            JOIN users ON users.id = posts.owner_id
            WHERE posts.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH updated AS (
                UPDATE posts
                SET title = $2,
                    content = $3
                WHERE id = $1
                RETURNING id, title, content, owner_id, created_at
            )
            SELECT
                updated.id,
                updated.title,
                updated.content,
                updated.owner_id,
                users.username AS owner_username,
                updated.created_at
            FROM updated
            JOIN users ON users.id = updated.owner_id
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        // comments go with the post through ON DELETE CASCADE
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                posts.id,
                posts.title,
                posts.content,
                posts.owner_id,
                users.username AS owner_username,
                posts.created_at
            FROM posts
            JOIN users ON users.id = posts.owner_id
            ORDER BY posts.created_at DESC, posts.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.title,
        row.content,
        row.owner_id,
        row.owner_username,
        row.created_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("owner".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
