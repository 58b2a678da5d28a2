use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::application::blog_service::PostDetail;
use crate::domain::comment::CommentRequest;
use crate::domain::error::DomainError;
use crate::domain::post::PostRequest;
use crate::domain::validation::FieldErrors;
use crate::presentation::AppState;
use crate::presentation::flash::Flash;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::session::SessionUser;
use crate::presentation::views::{self, PageContext, posts::post_url};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PostForm {
    pub(crate) title: String,
    pub(crate) content: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CommentForm {
    pub(crate) content: String,
}

pub(crate) async fn list_posts(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
) -> AppResult<Response> {
    let posts = state.blog_service.list_posts().await?;

    let (jar, ctx) = PageContext::load(jar, Some(user));
    Ok((jar, views::posts::index(&ctx, &posts)).into_response())
}

pub(crate) async fn post_detail(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let detail = state.blog_service.post_detail(id).await?;
    Ok(render_detail(jar, user, &detail, "", &FieldErrors::new()))
}

pub(crate) async fn add_comment(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let req = CommentRequest {
        content: form.content.clone(),
    };

    match state.blog_service.add_comment(user.user_id, id, req).await {
        Ok(_) => Ok((Flash::CommentAdded.set(jar), Redirect::to(&post_url(id))).into_response()),
        Err(DomainError::Validation(errors)) => {
            let detail = state.blog_service.post_detail(id).await?;
            Ok(render_detail(jar, user, &detail, &form.content, &errors))
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn create_post_form(user: SessionUser, jar: CookieJar) -> Response {
    render_post_form(
        jar,
        user,
        "Create Post",
        "/post/create/",
        &PostForm::default(),
        &FieldErrors::new(),
    )
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let req = PostRequest {
        title: form.title.clone(),
        content: form.content.clone(),
    };

    match state.blog_service.create_post(user.user_id, req).await {
        Ok(_) => Ok((Flash::PostCreated.set(jar), Redirect::to("/")).into_response()),
        Err(DomainError::Validation(errors)) => Ok(render_post_form(
            jar,
            user,
            "Create Post",
            "/post/create/",
            &form,
            &errors,
        )),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn edit_post_form(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match state.blog_service.owned_post(user.user_id, id).await {
        Ok(post) => {
            let form = PostForm {
                title: post.title,
                content: post.content,
            };
            Ok(render_post_form(
                jar,
                user,
                "Edit Post",
                &edit_url(id),
                &form,
                &FieldErrors::new(),
            ))
        }
        Err(DomainError::Forbidden) => Ok(forbidden(jar, Flash::EditForbidden)),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn update_post(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let req = PostRequest {
        title: form.title.clone(),
        content: form.content.clone(),
    };

    match state.blog_service.update_post(user.user_id, id, req).await {
        Ok(post) => {
            Ok((Flash::PostUpdated.set(jar), Redirect::to(&post_url(post.id))).into_response())
        }
        Err(DomainError::Forbidden) => Ok(forbidden(jar, Flash::EditForbidden)),
        Err(DomainError::Validation(errors)) => Ok(render_post_form(
            jar,
            user,
            "Edit Post",
            &edit_url(id),
            &form,
            &errors,
        )),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn delete_post_confirm(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match state.blog_service.owned_post(user.user_id, id).await {
        Ok(post) => {
            let (jar, ctx) = PageContext::load(jar, Some(user));
            Ok((jar, views::posts::confirm_delete(&ctx, &post)).into_response())
        }
        Err(DomainError::Forbidden) => Ok(forbidden(jar, Flash::DeleteForbidden)),
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    user: SessionUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match state.blog_service.delete_post(user.user_id, id).await {
        Ok(()) => Ok((Flash::PostDeleted.set(jar), Redirect::to("/")).into_response()),
        Err(DomainError::Forbidden) => Ok(forbidden(jar, Flash::DeleteForbidden)),
        Err(err) => Err(err.into()),
    }
}

fn edit_url(id: i64) -> String {
    format!("/post/{id}/edit/")
}

fn forbidden(jar: CookieJar, flash: Flash) -> Response {
    (flash.set(jar), Redirect::to("/")).into_response()
}

fn render_detail(
    jar: CookieJar,
    user: SessionUser,
    detail: &PostDetail,
    comment: &str,
    errors: &FieldErrors,
) -> Response {
    let is_owner = detail.post.is_owned_by(user.user_id);
    let (jar, ctx) = PageContext::load(jar, Some(user));
    (jar, views::posts::detail(&ctx, detail, is_owner, comment, errors)).into_response()
}

fn render_post_form(
    jar: CookieJar,
    user: SessionUser,
    heading: &str,
    action: &str,
    form: &PostForm,
    errors: &FieldErrors,
) -> Response {
    let (jar, ctx) = PageContext::load(jar, Some(user));
    let page = views::posts::post_form(&ctx, heading, action, &form.title, &form.content, errors);
    (jar, page).into_response()
}
