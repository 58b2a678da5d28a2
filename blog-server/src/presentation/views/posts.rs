use maud::{Markup, html};

use super::{PageContext, field_errors, layout, timestamp};
use crate::application::blog_service::PostDetail;
use crate::domain::post::{Post, TITLE_MAX_CHARS};
use crate::domain::validation::FieldErrors;

pub(crate) fn post_url(id: i64) -> String {
    format!("/post/{id}/")
}

pub(crate) fn index(ctx: &PageContext, posts: &[Post]) -> Markup {
    layout(
        "All posts",
        ctx,
        html! {
            h1 { "All posts" }
            @if posts.is_empty() {
                p class="meta" { "No posts yet. " a href="/post/create/" { "Write the first one." } }
            }
            @for post in posts {
                article {
                    h2 { a href=(post_url(post.id)) { (post.title) } }
                    p class="meta" {
                        "by " (post.owner_username) " on " (timestamp(&post.created_at))
                    }
                }
            }
        },
    )
}

pub(crate) fn detail(
    ctx: &PageContext,
    detail: &PostDetail,
    is_owner: bool,
    comment: &str,
    errors: &FieldErrors,
) -> Markup {
    let post = &detail.post;
    layout(
        &post.title,
        ctx,
        html! {
            article {
                h1 { (post.title) }
                p class="meta" {
                    "by " (post.owner_username) " on " (timestamp(&post.created_at))
                }
                div class="content" { (post.content) }
                @if is_owner {
                    p {
                        a href={ "/post/" (post.id) "/edit/" } { "Edit" }
                        " · "
                        a href={ "/post/" (post.id) "/delete/" } { "Delete" }
                    }
                }
            }

            section {
                h2 { "Comments (" (detail.comments.len()) ")" }
                form method="post" action=(post_url(post.id)) {
                    label for="content" { "Add a comment" }
                    textarea id="content" name="content" rows="3"
                        placeholder="Write your comment here..." { (comment) }
                    (field_errors(errors, "content"))
                    button type="submit" { "Comment" }
                }
                @for item in &detail.comments {
                    article {
                        p class="meta" {
                            strong { (item.owner_username) } " · " (timestamp(&item.created_at))
                        }
                        div class="content" { (item.content) }
                    }
                }
            }
        },
    )
}

pub(crate) fn post_form(
    ctx: &PageContext,
    heading: &str,
    action: &str,
    title: &str,
    content: &str,
    errors: &FieldErrors,
) -> Markup {
    layout(
        heading,
        ctx,
        html! {
            h1 { (heading) }
            form method="post" action=(action) {
                label for="title" { "Title" }
                input id="title" name="title" type="text" maxlength=(TITLE_MAX_CHARS)
                    placeholder="Post title" value=(title);
                (field_errors(errors, "title"))

                label for="content" { "Content" }
                textarea id="content" name="content" rows="5"
                    placeholder="Write your post content" { (content) }
                (field_errors(errors, "content"))

                button type="submit" { "Save" }
            }
        },
    )
}

pub(crate) fn confirm_delete(ctx: &PageContext, post: &Post) -> Markup {
    layout(
        "Delete post",
        ctx,
        html! {
            h1 { "Delete post" }
            p { "Delete \u{201c}" (post.title) "\u{201d} and all of its comments?" }
            form method="post" action={ "/post/" (post.id) "/delete/" } {
                button type="submit" { "Delete" }
                " "
                a href=(post_url(post.id)) { "Cancel" }
            }
        },
    )
}
