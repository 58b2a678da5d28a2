use axum::http::StatusCode;
use maud::{Markup, html};

use super::bare_layout;

pub(crate) fn error_page(status: StatusCode, detail: Option<&str>) -> Markup {
    let heading = match status {
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::BAD_REQUEST => "Bad request",
        StatusCode::CONFLICT => "Conflict",
        StatusCode::UNAUTHORIZED => "Unauthorized",
        _ => "Something went wrong",
    };

    bare_layout(
        heading,
        html! {
            h1 { (status.as_u16()) " · " (heading) }
            @if let Some(detail) = detail {
                p { (detail) }
            }
            p { a href="/" { "Back to all posts" } }
        },
    )
}
