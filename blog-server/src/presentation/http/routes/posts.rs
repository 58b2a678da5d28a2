use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::posts::{
    add_comment, create_post, create_post_form, delete_post, delete_post_confirm, edit_post_form,
    list_posts, post_detail, update_post,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/post/create/", get(create_post_form).post(create_post))
        .route("/post/{id}/", get(post_detail).post(add_comment))
        .route("/post/{id}/edit/", get(edit_post_form).post(update_post))
        .route("/post/{id}/delete/", get(delete_post_confirm).post(delete_post))
}
