use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{EMAIL_TAKEN, LoginRequest, RegisterRequest, USERNAME_TAKEN, User};
use crate::domain::validation::FieldErrors;
use crate::infrastructure::jwt::JwtService;

/// An authenticated session: who it belongs to and the signed token the
/// client presents on later requests.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) user: User,
    pub(crate) token: String,
    pub(crate) expires_at: DateTime<Utc>,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: Arc<JwtService>,
}

impl<R: UserRepository> AuthService<R> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(repo: R, jwt: Arc<JwtService>) -> Self {
        Self { repo, jwt }
    }

    /// Creates the account and returns a session for it, so a new user is
    /// signed in right away.
    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<Session, DomainError> {
        let req = req.normalized();
        let mut errors = req.format_errors();

        if !errors.has("username") && self.repo.find_by_username(&req.username).await?.is_some() {
            errors.add("username", USERNAME_TAKEN);
        }
        if !errors.has("email") && self.repo.find_by_email(&req.email).await?.is_some() {
            errors.add("email", EMAIL_TAKEN);
        }
        errors.into_result()?;

        let password_hash = self.hash_password(&req.password1)?;
        let new_user = Self::into_new_user(req, password_hash);

        let user = match self.repo.create_user(new_user).await {
            Ok(user) => user,
            Err(DomainError::AlreadyExists(resource)) => {
                return Err(duplicate_field_error(resource));
            }
            Err(err) => return Err(err),
        };

        info!(user_id = user.id, username = %user.username, "user registered");
        self.start_session(user)
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<Session, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.repo.find_by_username(&req.username).await? {
            Some(user_creds) => user_creds,
            None => {
                return Err(self.reject_unknown_user(&req.password, Self::DUMMY_PASSWORD_HASH));
            }
        };

        self.verify_password(&req.password, &user_creds.password_hash)?;

        info!(user_id = user_creds.user.id, "user logged in");
        self.start_session(user_creds.user)
    }

    /// Spends the same argon2 work as a real check so timing does not leak
    /// whether the username exists. Only a broken hash surfaces as its own error.
    fn reject_unknown_user(&self, raw_password: &str, dummy_hash: &str) -> DomainError {
        match self.verify_password(raw_password, dummy_hash) {
            Ok(()) | Err(DomainError::InvalidCredentials) => DomainError::InvalidCredentials,
            Err(err) => err,
        }
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    fn start_session(&self, user: User) -> Result<Session, DomainError> {
        let issued = self
            .jwt
            .issue(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(Session {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    fn into_new_user(req: RegisterRequest, password_hash: String) -> NewUser {
        NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        }
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// A unique-constraint hit that slipped past the lookup is still reported
/// on the form field it belongs to.
fn duplicate_field_error(resource: String) -> DomainError {
    let mut errors = FieldErrors::new();
    match resource.as_str() {
        "username" => errors.add("username", USERNAME_TAKEN),
        "email" => errors.add("email", EMAIL_TAKEN),
        _ => return DomainError::AlreadyExists(resource),
    }
    DomainError::Validation(errors)
}
