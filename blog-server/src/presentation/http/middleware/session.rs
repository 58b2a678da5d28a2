use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use tracing::debug;

use crate::application::auth_service::Session;
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

pub(crate) const SESSION_COOKIE: &str = "session";

/// The signed-in user of the current request.
///
/// As a plain extractor it turns anonymous requests into a redirect to the
/// login page; as `Option<SessionUser>` it never rejects.
#[derive(Debug, Clone)]
pub(crate) struct SessionUser {
    pub(crate) user_id: i64,
    pub(crate) username: String,
}

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .ok_or_else(|| AppError::LoginRequired {
                next: parts.uri.path().to_string(),
            })
    }
}

impl<S> OptionalFromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<SessionUser>().cloned())
    }
}

/// Resolves the session cookie into a `SessionUser` request extension.
/// Missing, expired or tampered cookies leave the request anonymous.
pub(crate) async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        match state.jwt.verify(cookie.value().trim()) {
            Ok(claims) => {
                request.extensions_mut().insert(SessionUser {
                    user_id: claims.uid,
                    username: claims.username,
                });
            }
            Err(err) => debug!(error = %err, "ignoring invalid session cookie"),
        }
    }

    next.run(request).await
}

pub(crate) fn start_session(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    let max_age = (session.expires_at - Utc::now()).num_seconds().max(0);

    jar.add(
        Cookie::build((SESSION_COOKIE, session.token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure)
            .max_age(time::Duration::seconds(max_age)),
    )
}

pub(crate) fn end_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Only same-site absolute paths are accepted as post-login targets.
pub(crate) fn safe_next(next: Option<&str>) -> Option<&str> {
    let next = next?.trim();
    let is_local = next.starts_with('/')
        && !next.starts_with("//")
        && !next.contains('\\')
        && next
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'));
    is_local.then_some(next)
}
