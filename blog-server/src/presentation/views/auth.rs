use maud::{Markup, html};

use super::{PageContext, field_errors, layout};
use crate::domain::validation::FieldErrors;

pub(crate) fn register(
    ctx: &PageContext,
    username: &str,
    email: &str,
    errors: &FieldErrors,
    notice: Option<&str>,
) -> Markup {
    layout(
        "Register",
        ctx,
        html! {
            h1 { "Register" }
            @if let Some(notice) = notice {
                p class="notice" { (notice) }
            }
            form method="post" action="/register/" {
                label for="username" { "Username" }
                input id="username" name="username" type="text" value=(username) autocomplete="username";
                (field_errors(errors, "username"))

                label for="email" { "Email" }
                input id="email" name="email" type="email" value=(email) autocomplete="email";
                (field_errors(errors, "email"))

                label for="password1" { "Password" }
                input id="password1" name="password1" type="password" autocomplete="new-password";
                (field_errors(errors, "password1"))

                label for="password2" { "Password confirmation" }
                input id="password2" name="password2" type="password" autocomplete="new-password";
                (field_errors(errors, "password2"))

                button type="submit" { "Create account" }
            }
            p class="meta" { "Already registered? " a href="/login/" { "Log in" } }
        },
    )
}

pub(crate) fn login(
    ctx: &PageContext,
    username: &str,
    next: Option<&str>,
    errors: &FieldErrors,
    notice: Option<&str>,
) -> Markup {
    layout(
        "Log in",
        ctx,
        html! {
            h1 { "Log in" }
            @if let Some(notice) = notice {
                p class="notice" { (notice) }
            }
            form method="post" action="/login/" {
                @if let Some(next) = next {
                    input type="hidden" name="next" value=(next);
                }
                label for="username" { "Username" }
                input id="username" name="username" type="text" value=(username) autocomplete="username";
                (field_errors(errors, "username"))

                label for="password" { "Password" }
                input id="password" name="password" type="password" autocomplete="current-password";
                (field_errors(errors, "password"))

                button type="submit" { "Log in" }
            }
            p class="meta" { "No account yet? " a href="/register/" { "Register" } }
        },
    )
}
