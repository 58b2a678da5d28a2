use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest};
use crate::domain::validation::FieldErrors;
use crate::presentation::AppState;
use crate::presentation::flash::Flash;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::session::{
    SessionUser, end_session, safe_next, start_session,
};
use crate::presentation::views::{self, PageContext};

const REGISTER_FAILED: &str = "Please correct the errors below.";
const LOGIN_FAILED: &str = "Invalid username or password.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RegisterForm {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password1: String,
    pub(crate) password2: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginForm {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) next: Option<String>,
}

pub(crate) async fn register_form(user: Option<SessionUser>, jar: CookieJar) -> Response {
    let (jar, ctx) = PageContext::load(jar, user);
    (jar, views::auth::register(&ctx, "", "", &FieldErrors::new(), None)).into_response()
}

pub(crate) async fn register(
    State(state): State<AppState>,
    user: Option<SessionUser>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let req = RegisterRequest {
        username: form.username.clone(),
        email: form.email.clone(),
        password1: form.password1,
        password2: form.password2,
    };

    match state.auth_service.register(req).await {
        Ok(session) => {
            let jar = start_session(jar, &session, state.cookie_secure);
            Ok((Flash::Registered.set(jar), Redirect::to("/")).into_response())
        }
        Err(DomainError::Validation(errors)) => {
            let (jar, ctx) = PageContext::load(jar, user);
            let page = views::auth::register(
                &ctx,
                &form.username,
                &form.email,
                &errors,
                Some(REGISTER_FAILED),
            );
            Ok((jar, page).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn login_form(
    user: Option<SessionUser>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    let next = safe_next(query.next.as_deref());
    let (jar, ctx) = PageContext::load(jar, user);
    (jar, views::auth::login(&ctx, "", next, &FieldErrors::new(), None)).into_response()
}

pub(crate) async fn login(
    State(state): State<AppState>,
    user: Option<SessionUser>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let next = safe_next(form.next.as_deref()).map(str::to_string);
    let req = LoginRequest {
        username: form.username.clone(),
        password: form.password,
    };

    let errors = match state.auth_service.login(req).await {
        Ok(session) => {
            let jar = start_session(jar, &session, state.cookie_secure);
            let target = next.as_deref().unwrap_or("/");
            return Ok((Flash::WelcomeBack.set(jar), Redirect::to(target)).into_response());
        }
        Err(DomainError::InvalidCredentials) => FieldErrors::new(),
        Err(DomainError::Validation(errors)) => errors,
        Err(err) => return Err(err.into()),
    };

    let (jar, ctx) = PageContext::load(jar, user);
    let page = views::auth::login(
        &ctx,
        &form.username,
        next.as_deref(),
        &errors,
        Some(LOGIN_FAILED),
    );
    Ok((jar, page).into_response())
}

pub(crate) async fn logout(user: SessionUser, jar: CookieJar) -> Response {
    info!(user_id = user.user_id, "user logged out");
    let jar = end_session(jar);
    (Flash::LoggedOut.set(jar), Redirect::to("/login/")).into_response()
}
