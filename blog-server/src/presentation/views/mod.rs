use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::domain::validation::FieldErrors;
use crate::presentation::flash::Flash;
use crate::presentation::http::middleware::session::SessionUser;

pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod posts;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 0 auto; padding: 1rem; color: #222; }
nav { display: flex; gap: 1rem; align-items: center; border-bottom: 1px solid #ddd; padding-bottom: .5rem; margin-bottom: 1rem; }
nav .spacer { flex: 1; }
form.inline { display: inline; }
label { display: block; margin-top: .75rem; font-weight: 600; }
input, textarea { width: 100%; box-sizing: border-box; padding: .4rem; font: inherit; }
button { margin-top: .75rem; padding: .4rem .9rem; font: inherit; cursor: pointer; }
.flash { padding: .6rem .8rem; border-radius: 4px; margin-bottom: 1rem; }
.flash-success { background: #e6f4ea; border: 1px solid #9bd3ab; }
.flash-error { background: #fdecea; border: 1px solid #f1a9a0; }
.notice { color: #b3261e; font-weight: 600; }
.field-error { color: #b3261e; margin: .25rem 0 0; font-size: .9rem; }
.meta { color: #666; font-size: .9rem; }
article { border-bottom: 1px solid #eee; padding: .75rem 0; }
.content { white-space: pre-wrap; }
"#;

/// Everything the shared layout needs besides the page body.
#[derive(Debug, Clone)]
pub(crate) struct PageContext {
    pub(crate) user: Option<SessionUser>,
    pub(crate) flash: Option<Flash>,
}

impl PageContext {
    /// Consumes the pending flash message; the returned jar must be part of
    /// the response so the client drops it too.
    pub(crate) fn load(jar: CookieJar, user: Option<SessionUser>) -> (CookieJar, Self) {
        let (jar, flash) = Flash::take(jar);
        (jar, Self { user, flash })
    }

    fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }
}

pub(crate) fn layout(title: &str, ctx: &PageContext, body: Markup) -> Markup {
    let account = html! {
        @if let Some(user) = &ctx.user {
            a href="/post/create/" { "New post" }
            span class="meta" { "Signed in as " strong { (user.username) } }
            form class="inline" method="post" action="/logout/" {
                button type="submit" { "Log out" }
            }
        } @else {
            a href="/login/" { "Log in" }
            a href="/register/" { "Register" }
        }
    };
    let notice = html! {
        @if let Some(flash) = ctx.flash {
            div class={ "flash " (flash.level().css_class()) } {
                (flash.message(ctx.username()))
            }
        }
    };
    document(title, account, notice, body)
}

/// Page shell without account links, for responses rendered outside a
/// handler where the session is not known.
pub(crate) fn bare_layout(title: &str, body: Markup) -> Markup {
    document(title, html! {}, html! {}, body)
}

fn document(title: &str, account: Markup, notice: Markup, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · Blog" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                nav {
                    a href="/" { strong { "Blog" } }
                    span class="spacer" {}
                    (account)
                }
                (notice)
                main { (body) }
            }
        }
    }
}

pub(crate) fn field_errors(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @for message in errors.for_field(field) {
            p class="field-error" { (message) }
        }
    }
}

pub(crate) fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y, %H:%M").to_string()
}
