use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::blog_service::BlogService;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod flash;
pub(crate) mod http;
pub(crate) mod views;

pub(crate) type DynUserRepository = Arc<dyn UserRepository>;
pub(crate) type DynPostRepository = Arc<dyn PostRepository>;
pub(crate) type DynCommentRepository = Arc<dyn CommentRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<AuthService<DynUserRepository>>,
    pub(crate) blog_service: Arc<BlogService<DynPostRepository, DynCommentRepository>>,
    pub(crate) jwt: Arc<JwtService>,
    pub(crate) cookie_secure: bool,
}

impl AppState {
    pub(crate) fn new(
        users: DynUserRepository,
        posts: DynPostRepository,
        comments: DynCommentRepository,
        jwt: Arc<JwtService>,
        cookie_secure: bool,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(users, jwt.clone())),
            blog_service: Arc::new(BlogService::new(posts, comments)),
            jwt,
            cookie_secure,
        }
    }
}
