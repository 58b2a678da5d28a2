use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;
use super::validation::{FieldErrors, REQUIRED, max_chars, required};

pub(crate) const USERNAME_MAX_CHARS: usize = 150;
pub(crate) const PASSWORD_MIN_CHARS: usize = 8;

pub(crate) const USERNAME_HAS_SPACES: &str = "Username cannot contain spaces.";
pub(crate) const USERNAME_INVALID: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub(crate) const USERNAME_TAKEN: &str = "Username already exists. Please choose another one.";
pub(crate) const EMAIL_INVALID: &str = "Enter a valid email address.";
pub(crate) const EMAIL_TAKEN: &str = "Email already exists. Please use a different email.";
pub(crate) const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub(crate) const PASSWORD_TOO_SHORT: &str =
    "This password is too short. It must contain at least 8 characters.";
pub(crate) const PASSWORD_NUMERIC: &str = "This password is entirely numeric.";
pub(crate) const PASSWORD_LIKE_USERNAME: &str = "The password is too similar to the username.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password1: String,
    pub(crate) password2: String,
}

impl RegisterRequest {
    /// Trims username and email and lower-cases the email. Passwords are
    /// kept byte-for-byte.
    pub(crate) fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password1: self.password1,
            password2: self.password2,
        }
    }

    /// Collects every format violation. Uniqueness is checked separately
    /// because it needs the user store.
    pub(crate) fn format_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let username = required(&mut errors, "username", &self.username);
        if !username.is_empty() {
            check_username(&mut errors, &username);
        }

        let email = required(&mut errors, "email", &self.email);
        if !email.is_empty() && !email.validate_email() {
            errors.add("email", EMAIL_INVALID);
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if !self.password1.is_empty() {
            if self.password1 != self.password2 {
                errors.add("password2", PASSWORD_MISMATCH);
            } else {
                check_password_strength(&mut errors, &self.password2, &username);
            }
        }

        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let mut errors = FieldErrors::new();
        let username = required(&mut errors, "username", &self.username);
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result()?;

        Ok(Self {
            username,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            let mut errors = FieldErrors::new();
            errors.add("id", "must be > 0");
            return Err(errors.into());
        }

        Ok(Self {
            id,
            username: username.into(),
            email: email.into(),
        })
    }
}

fn check_username(errors: &mut FieldErrors, username: &str) {
    if username.chars().any(char::is_whitespace) {
        errors.add("username", USERNAME_HAS_SPACES);
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add("username", USERNAME_INVALID);
    }
    max_chars(errors, "username", username, USERNAME_MAX_CHARS);
}

fn check_password_strength(errors: &mut FieldErrors, password: &str, username: &str) {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.add("password2", PASSWORD_TOO_SHORT);
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add("password2", PASSWORD_NUMERIC);
    }

    let username = username.to_lowercase();
    let password = password.to_lowercase();
    if username.chars().count() >= 3 && (password.contains(&username) || username.contains(&password))
    {
        errors.add("password2", PASSWORD_LIKE_USERNAME);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        EMAIL_INVALID, LoginRequest, PASSWORD_LIKE_USERNAME, PASSWORD_MISMATCH, PASSWORD_NUMERIC,
        PASSWORD_TOO_SHORT, RegisterRequest, USERNAME_HAS_SPACES, USERNAME_INVALID, User,
    };
    use crate::domain::error::DomainError;

    fn register(username: &str, email: &str, password1: &str, password2: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        }
        .normalized()
    }

    #[test]
    fn valid_registration_has_no_errors() {
        let req = register("  valid_user ", " TeSt@Example.COM ", "s3cret-words", "s3cret-words");
        assert!(req.format_errors().is_empty());
        assert_eq!(req.username, "valid_user");
        assert_eq!(req.email, "test@example.com");
    }

    #[test]
    fn username_with_space_is_rejected() {
        let req = register("john doe", "john@example.com", "s3cret-words", "s3cret-words");
        let errors = req.format_errors();
        assert_eq!(
            errors.for_field("username").collect::<Vec<_>>(),
            vec![USERNAME_HAS_SPACES]
        );
    }

    #[test]
    fn username_with_symbols_is_rejected() {
        let req = register("john#doe", "john@example.com", "s3cret-words", "s3cret-words");
        let errors = req.format_errors();
        assert_eq!(
            errors.for_field("username").collect::<Vec<_>>(),
            vec![USERNAME_INVALID]
        );
    }

    #[test]
    fn independent_field_errors_are_reported_together() {
        let req = register("john doe", "not-an-email", "abc", "abd");
        let errors = req.format_errors();

        assert!(errors.has("username"));
        assert_eq!(errors.for_field("email").collect::<Vec<_>>(), vec![EMAIL_INVALID]);
        assert_eq!(
            errors.for_field("password2").collect::<Vec<_>>(),
            vec![PASSWORD_MISMATCH]
        );
    }

    #[test]
    fn weak_passwords_are_rejected() {
        let short_numeric = register("alice", "a@example.com", "1234", "1234").format_errors();
        let messages: Vec<_> = short_numeric.for_field("password2").collect();
        assert!(messages.contains(&PASSWORD_TOO_SHORT));
        assert!(messages.contains(&PASSWORD_NUMERIC));

        let like_username =
            register("alice", "a@example.com", "alice2024!", "alice2024!").format_errors();
        assert_eq!(
            like_username.for_field("password2").collect::<Vec<_>>(),
            vec![PASSWORD_LIKE_USERNAME]
        );
    }

    #[test]
    fn login_requires_both_fields() {
        let err = LoginRequest::default()
            .validate()
            .expect_err("empty login must fail");
        match err {
            DomainError::Validation(errors) => {
                assert!(errors.has("username"));
                assert!(errors.has("password"));
            }
            _ => panic!("expected DomainError::Validation"),
        }
    }

    #[test]
    fn user_new_rejects_non_positive_id() {
        let result = User::new(0, "valid_user", "test@example.com");
        assert!(result.is_err());
    }

    #[test]
    fn user_new_keeps_identity_fields() {
        let user = User::new(3, "valid_user", "test@example.com").expect("user must be valid");
        assert_eq!(user.id, 3);
        assert_eq!(user.username, "valid_user");
        assert_eq!(user.email, "test@example.com");
    }
}
