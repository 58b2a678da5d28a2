use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub(crate) fn css_class(self) -> &'static str {
        match self {
            FlashLevel::Success => "flash-success",
            FlashLevel::Error => "flash-error",
        }
    }
}

/// A one-time notice shown on the next rendered page. Only the code
/// travels in the cookie; the text is produced at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flash {
    CommentAdded,
    PostCreated,
    PostUpdated,
    PostDeleted,
    EditForbidden,
    DeleteForbidden,
    Registered,
    WelcomeBack,
    LoggedOut,
}

impl Flash {
    const ALL: [Flash; 9] = [
        Flash::CommentAdded,
        Flash::PostCreated,
        Flash::PostUpdated,
        Flash::PostDeleted,
        Flash::EditForbidden,
        Flash::DeleteForbidden,
        Flash::Registered,
        Flash::WelcomeBack,
        Flash::LoggedOut,
    ];

    fn code(self) -> &'static str {
        match self {
            Flash::CommentAdded => "comment-added",
            Flash::PostCreated => "post-created",
            Flash::PostUpdated => "post-updated",
            Flash::PostDeleted => "post-deleted",
            Flash::EditForbidden => "edit-forbidden",
            Flash::DeleteForbidden => "delete-forbidden",
            Flash::Registered => "registered",
            Flash::WelcomeBack => "welcome-back",
            Flash::LoggedOut => "logged-out",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flash| flash.code() == code)
    }

    pub(crate) fn level(self) -> FlashLevel {
        match self {
            Flash::EditForbidden | Flash::DeleteForbidden => FlashLevel::Error,
            _ => FlashLevel::Success,
        }
    }

    pub(crate) fn message(self, username: Option<&str>) -> String {
        match self {
            Flash::CommentAdded => "Comment added successfully!".to_string(),
            Flash::PostCreated => "Post created successfully!".to_string(),
            Flash::PostUpdated => "Post updated successfully!".to_string(),
            Flash::PostDeleted => "Post deleted successfully!".to_string(),
            Flash::EditForbidden => "You are not allowed to edit this post.".to_string(),
            Flash::DeleteForbidden => "You are not allowed to delete this post.".to_string(),
            Flash::Registered => "Registration successful! Welcome.".to_string(),
            Flash::WelcomeBack => match username {
                Some(username) => format!("Welcome back, {username}!"),
                None => "Welcome back!".to_string(),
            },
            Flash::LoggedOut => "Logged out successfully.".to_string(),
        }
    }

    pub(crate) fn set(self, jar: CookieJar) -> CookieJar {
        jar.add(
            Cookie::build((FLASH_COOKIE, self.code()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        )
    }

    /// Reads the pending notice, if any, and clears it from the client.
    pub(crate) fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
        let Some(code) = jar.get(FLASH_COOKIE).map(|cookie| cookie.value().to_string()) else {
            return (jar, None);
        };
        let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
        (jar, Flash::from_code(&code))
    }
}
