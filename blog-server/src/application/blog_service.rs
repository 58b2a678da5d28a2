use tracing::{info, warn};

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::comment::{Comment, CommentRequest};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostRequest};

#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) post: Post,
    pub(crate) comments: Vec<Comment>,
}

pub(crate) struct BlogService<P: PostRepository, C: CommentRepository> {
    posts: P,
    comments: C,
}

impl<P: PostRepository, C: CommentRepository> BlogService<P, C> {
    pub(crate) fn new(posts: P, comments: C) -> Self {
        Self { posts, comments }
    }

    pub(crate) async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.posts.list_posts().await
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))
    }

    pub(crate) async fn post_detail(&self, id: i64) -> Result<PostDetail, DomainError> {
        let post = self.get_post(id).await?;
        let comments = self.comments.list_for_post(post.id).await?;
        Ok(PostDetail { post, comments })
    }

    pub(crate) async fn add_comment(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: CommentRequest,
    ) -> Result<Comment, DomainError> {
        let post = self.get_post(post_id).await?;
        let req = req.validate()?;

        let comment = self
            .comments
            .create_comment(NewComment {
                post_id: post.id,
                owner_id: actor_user_id,
                content: req.content,
            })
            .await?;

        info!(post_id, comment_id = comment.id, "comment added");
        Ok(comment)
    }

    pub(crate) async fn create_post(
        &self,
        actor_user_id: i64,
        req: PostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            content: req.content,
            owner_id: actor_user_id,
        };
        let post = self.posts.create_post(new_post).await?;

        info!(post_id = post.id, owner_id = actor_user_id, "post created");
        Ok(post)
    }

    /// Loads a post the actor is allowed to change.
    pub(crate) async fn owned_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<Post, DomainError> {
        let post = self.get_post(post_id).await?;
        if !post.is_owned_by(actor_user_id) {
            warn!(post_id, actor_user_id, "ownership check failed");
            return Err(DomainError::Forbidden);
        }
        Ok(post)
    }

    // The ownership check and the write below are separate statements; an
    // owner change landing in between is not detected.
    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: PostRequest,
    ) -> Result<Post, DomainError> {
        self.owned_post(actor_user_id, post_id).await?;
        let req = req.validate()?;

        let patch = PostPatch {
            title: req.title,
            content: req.content,
        };
        let post = self
            .posts
            .update_post(post_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        info!(post_id, "post updated");
        Ok(post)
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        self.owned_post(actor_user_id, post_id).await?;

        let deleted = self.posts.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }

        info!(post_id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::BlogService;
    use crate::data::comment_repository::{CommentRepository, NewComment};
    use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
    use crate::domain::comment::{Comment, CommentRequest};
    use crate::domain::error::DomainError;
    use crate::domain::post::{Post, PostRequest};

    #[derive(Clone)]
    struct FakePostRepo {
        created_input: Arc<Mutex<Option<NewPost>>>,
        post_for_get: Arc<Mutex<Option<Post>>>,
        update_call: Arc<Mutex<Option<(i64, PostPatch)>>>,
        delete_calls: Arc<Mutex<Vec<i64>>>,
        list_result: Arc<Mutex<Vec<Post>>>,
    }

    impl FakePostRepo {
        fn new() -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                post_for_get: Arc::new(Mutex::new(None)),
                update_call: Arc::new(Mutex::new(None)),
                delete_calls: Arc::new(Mutex::new(Vec::new())),
                list_result: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn with_post(post: Post) -> Self {
            let repo = Self::new();
            *repo
                .post_for_get
                .lock()
                .expect("post_for_get mutex poisoned") = Some(post);
            repo
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created_input mutex poisoned") = Some(input.clone());
            Ok(sample_post(1, &input.title, &input.content, input.owner_id))
        }

        async fn get_post(&self, _id: i64) -> Result<Option<Post>, DomainError> {
            Ok(self
                .post_for_get
                .lock()
                .expect("post_for_get mutex poisoned")
                .clone())
        }

        async fn update_post(
            &self,
            id: i64,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            *self.update_call.lock().expect("update_call mutex poisoned") =
                Some((id, patch.clone()));
            Ok(Some(sample_post(id, &patch.title, &patch.content, 10)))
        }

        async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
            self.delete_calls
                .lock()
                .expect("delete_calls mutex poisoned")
                .push(id);
            Ok(true)
        }

        async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
            Ok(self
                .list_result
                .lock()
                .expect("list_result mutex poisoned")
                .clone())
        }
    }

    #[derive(Clone, Default)]
    struct FakeCommentRepo {
        created: Arc<Mutex<Vec<NewComment>>>,
    }

    #[async_trait]
    impl CommentRepository for FakeCommentRepo {
        async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
            self.created
                .lock()
                .expect("created mutex poisoned")
                .push(input.clone());
            Comment::new(
                5,
                input.post_id,
                input.owner_id,
                "commenter",
                input.content,
                Utc::now(),
            )
        }

        async fn list_for_post(&self, _post_id: i64) -> Result<Vec<Comment>, DomainError> {
            Ok(Vec::new())
        }
    }

    fn build_service(posts: FakePostRepo) -> (BlogService<FakePostRepo, FakeCommentRepo>, FakeCommentRepo) {
        let comments = FakeCommentRepo::default();
        (BlogService::new(posts, comments.clone()), comments)
    }

    #[tokio::test]
    async fn create_post_normalizes_request_before_repo_call() {
        let repo = FakePostRepo::new();
        let (service, _) = build_service(repo.clone());

        let req = PostRequest {
            title: "  title  ".to_string(),
            content: "  content  ".to_string(),
        };

        let created = service
            .create_post(10, req)
            .await
            .expect("create_post must succeed");
        assert_eq!(created.title, "title");

        let input = repo
            .created_input
            .lock()
            .expect("created_input mutex poisoned")
            .clone()
            .expect("repo input must be captured");
        assert_eq!(input.title, "title");
        assert_eq!(input.content, "content");
        assert_eq!(input.owner_id, 10);
    }

    #[tokio::test]
    async fn get_post_returns_not_found_when_missing() {
        let (service, _) = build_service(FakePostRepo::new());

        let err = service
            .get_post(42)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_post_by_owner_writes_patch() {
        let repo = FakePostRepo::with_post(sample_post(7, "old", "old body", 10));
        let (service, _) = build_service(repo.clone());

        let req = PostRequest {
            title: "  new  ".to_string(),
            content: "  body  ".to_string(),
        };
        let updated = service
            .update_post(10, 7, req)
            .await
            .expect("update must succeed");
        assert_eq!(updated.id, 7);

        let (id, patch) = repo
            .update_call
            .lock()
            .expect("update_call mutex poisoned")
            .clone()
            .expect("update call must be captured");
        assert_eq!(id, 7);
        assert_eq!(patch.title, "new");
        assert_eq!(patch.content, "body");
    }

    #[tokio::test]
    async fn update_post_by_non_owner_is_forbidden_and_writes_nothing() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", "body", 99));
        let (service, _) = build_service(repo.clone());

        let req = PostRequest {
            title: "hijack".to_string(),
            content: "hijack".to_string(),
        };
        let err = service
            .update_post(10, 7, req)
            .await
            .expect_err("must be forbidden");

        assert!(matches!(err, DomainError::Forbidden));
        assert!(
            repo.update_call
                .lock()
                .expect("update_call mutex poisoned")
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_post_returns_forbidden_for_non_owner() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", "body", 99));
        let (service, _) = build_service(repo.clone());

        let err = service
            .delete_post(10, 7)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
        assert!(
            repo.delete_calls
                .lock()
                .expect("delete_calls mutex poisoned")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn delete_post_by_owner_deletes() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", "body", 10));
        let (service, _) = build_service(repo.clone());

        service
            .delete_post(10, 7)
            .await
            .expect("owner may delete");
        assert_eq!(
            *repo.delete_calls.lock().expect("delete_calls mutex poisoned"),
            vec![7]
        );
    }

    #[tokio::test]
    async fn empty_comment_is_rejected_without_insert() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", "body", 99));
        let (service, comments) = build_service(repo);

        let err = service
            .add_comment(10, 7, CommentRequest { content: "   ".to_string() })
            .await
            .expect_err("blank comment must fail");

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(comments.created.lock().expect("created mutex poisoned").is_empty());
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found() {
        let (service, comments) = build_service(FakePostRepo::new());

        let err = service
            .add_comment(10, 7, CommentRequest { content: "hi".to_string() })
            .await
            .expect_err("post is missing");

        assert!(matches!(err, DomainError::NotFound(_)));
        assert!(comments.created.lock().expect("created mutex poisoned").is_empty());
    }

    #[tokio::test]
    async fn comment_is_owned_by_actor() {
        let repo = FakePostRepo::with_post(sample_post(7, "title", "body", 99));
        let (service, comments) = build_service(repo);

        let comment = service
            .add_comment(10, 7, CommentRequest { content: " nice ".to_string() })
            .await
            .expect("comment must be created");

        assert_eq!(comment.owner_id, 10);
        assert_eq!(comment.post_id, 7);
        let created = comments.created.lock().expect("created mutex poisoned");
        assert_eq!(created[0].content, "nice");
    }

    fn sample_post(id: i64, title: &str, content: &str, owner_id: i64) -> Post {
        Post::new(
            id,
            title.to_string(),
            content.to_string(),
            owner_id,
            "owner",
            Utc::now(),
        )
        .expect("sample post must be valid")
    }
}
