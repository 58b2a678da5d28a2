//! In-process store backing the router tests. Mirrors the schema rules the
//! Postgres implementation relies on: unique usernames and emails, foreign
//! keys, cascade deletes and newest-first ordering.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::user::User;

#[derive(Clone)]
struct PostRecord {
    id: i64,
    title: String,
    content: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
struct CommentRecord {
    id: i64,
    post_id: i64,
    owner_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    posts: Vec<PostRecord>,
    comments: Vec<CommentRecord>,
    next_id: i64,
    frozen_at: Option<DateTime<Utc>>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn now(&self) -> DateTime<Utc> {
        self.frozen_at.unwrap_or_else(Utc::now)
    }

    fn username_of(&self, user_id: i64) -> Result<String, DomainError> {
        self.users
            .iter()
            .find(|creds| creds.user.id == user_id)
            .map(|creds| creds.user.username.clone())
            .ok_or_else(|| DomainError::NotFound("owner".to_string()))
    }

    fn to_post(&self, record: &PostRecord) -> Result<Post, DomainError> {
        Post::new(
            record.id,
            record.title.clone(),
            record.content.clone(),
            record.owner_id,
            self.username_of(record.owner_id)?,
            record.created_at,
        )
    }

    fn to_comment(&self, record: &CommentRecord) -> Result<Comment, DomainError> {
        Comment::new(
            record.id,
            record.post_id,
            record.owner_id,
            self.username_of(record.owner_id)?,
            record.content.clone(),
            record.created_at,
        )
    }
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every row gets the same `created_at`, so ordering falls back to ids.
    pub(crate) fn frozen_at(at: DateTime<Utc>) -> Self {
        let store = Self::default();
        store.lock().frozen_at = Some(at);
        store
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store mutex poisoned")
    }

    pub(crate) fn comment_count(&self, post_id: i64) -> usize {
        self.lock()
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .count()
    }

    pub(crate) fn post_created_at(&self, post_id: i64) -> Option<DateTime<Utc>> {
        self.lock()
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .map(|post| post.created_at)
    }

    pub(crate) fn post_snapshot(&self, post_id: i64) -> Option<(String, String)> {
        self.lock()
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .map(|post| (post.title.clone(), post.content.clone()))
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut tables = self.lock();
        if tables.users.iter().any(|c| c.user.username == input.username) {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        if tables.users.iter().any(|c| c.user.email == input.email) {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }

        let id = tables.next_id();
        let user = User::new(id, input.username, input.email)?;
        tables.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.email == email)
            .cloned())
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut tables = self.lock();
        tables.username_of(input.owner_id)?;

        let record = PostRecord {
            id: tables.next_id(),
            title: input.title,
            content: input.content,
            owner_id: input.owner_id,
            created_at: tables.now(),
        };
        tables.posts.push(record.clone());
        tables.to_post(&record)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let tables = self.lock();
        tables
            .posts
            .iter()
            .find(|post| post.id == id)
            .map(|record| tables.to_post(record))
            .transpose()
    }

    async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let mut tables = self.lock();
        let Some(record) = tables.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        record.title = patch.title;
        record.content = patch.content;
        let record = record.clone();
        tables.to_post(&record).map(Some)
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut tables = self.lock();
        let before = tables.posts.len();
        tables.posts.retain(|post| post.id != id);
        if tables.posts.len() == before {
            return Ok(false);
        }
        tables.comments.retain(|comment| comment.post_id != id);
        Ok(true)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let tables = self.lock();
        let mut records = tables.posts.clone();
        newest_first(&mut records, |post| (post.created_at, post.id));
        records.iter().map(|record| tables.to_post(record)).collect()
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut tables = self.lock();
        if !tables.posts.iter().any(|post| post.id == input.post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        tables.username_of(input.owner_id)?;

        let record = CommentRecord {
            id: tables.next_id(),
            post_id: input.post_id,
            owner_id: input.owner_id,
            content: input.content,
            created_at: tables.now(),
        };
        tables.comments.push(record.clone());
        tables.to_comment(&record)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let tables = self.lock();
        let mut records: Vec<_> = tables
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        newest_first(&mut records, |comment| (comment.created_at, comment.id));
        records
            .iter()
            .map(|record| tables.to_comment(record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::MemoryStore;
    use crate::data::comment_repository::{CommentRepository, NewComment};
    use crate::data::post_repository::{NewPost, PostRepository};
    use crate::data::user_repository::{NewUser, UserRepository};

    #[tokio::test]
    async fn equal_timestamps_list_higher_ids_first() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let store = MemoryStore::frozen_at(at);
        let owner = store
            .create_user(NewUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let mut post_ids = Vec::new();
        for title in ["first", "second"] {
            let post = store
                .create_post(NewPost {
                    title: title.to_string(),
                    content: "body".to_string(),
                    owner_id: owner.id,
                })
                .await
                .unwrap();
            post_ids.push(post.id);
        }

        let mut comment_ids = Vec::new();
        for content in ["older", "newer"] {
            let comment = store
                .create_comment(NewComment {
                    post_id: post_ids[0],
                    owner_id: owner.id,
                    content: content.to_string(),
                })
                .await
                .unwrap();
            assert_eq!(comment.created_at, at);
            comment_ids.push(comment.id);
        }

        let posts = store.list_posts().await.unwrap();
        assert_eq!(
            posts.iter().map(|post| post.id).collect::<Vec<_>>(),
            vec![post_ids[1], post_ids[0]]
        );

        let comments = store.list_for_post(post_ids[0]).await.unwrap();
        assert_eq!(
            comments.iter().map(|comment| comment.id).collect::<Vec<_>>(),
            vec![comment_ids[1], comment_ids[0]]
        );
    }
}
