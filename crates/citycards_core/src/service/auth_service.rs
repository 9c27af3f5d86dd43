//! Account and session use-case service.
//!
//! # Responsibility
//! - Registration with credential validation (the one place field-level
//!   validation exists in this system).
//! - Login/logout and cookie-token resolution.
//!
//! # Invariants
//! - Passwords are stored only as salted argon2id PHC strings.
//! - Login failures never reveal whether the username or the password was
//!   wrong.
//! - Logout is idempotent: an unknown token is not an error.

use crate::model::user::{Session, User};
use crate::repo::session_repo::SessionRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const USERNAME_MAX_CHARS: usize = 150;
const PASSWORD_MIN_CHARS: usize = 8;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

/// Service error for signup/login/session use-cases.
#[derive(Debug)]
pub enum AuthError {
    /// Signup form rejected; messages are user-facing, one per rule broken.
    Validation(Vec<String>),
    /// Unknown username or wrong password (deliberately indistinct).
    InvalidCredentials,
    /// Password hashing backend failure.
    Hash(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(messages) => {
                write!(f, "signup validation failed: {}", messages.join("; "))
            }
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::Hash(message) => write!(f, "password hashing failed: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Auth service facade over account and session repositories.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    users: U,
    sessions: S,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(users: U, sessions: S) -> Self {
        Self { users, sessions }
    }

    /// Registers a new account and logs it in (session included).
    ///
    /// Validation rules mirror the standard registration form: username
    /// format and length, password length, non-numeric password, matching
    /// confirmation, unique username.
    pub fn signup(
        &self,
        username: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<(User, Session), AuthError> {
        let username = username.trim();
        let mut problems = validate_credentials(username, password, password_confirm);

        if problems.is_empty() && self.users.find_by_username(username)?.is_some() {
            problems.push("A user with that username already exists.".to_string());
        }
        if !problems.is_empty() {
            return Err(AuthError::Validation(problems));
        }

        let password_hash = hash_password(password)?;
        let user = match self.users.create_user(username, &password_hash) {
            Ok(user) => user,
            // Concurrent signup with the same name: report it like any
            // other validation failure.
            Err(RepoError::Conflict(_)) => {
                return Err(AuthError::Validation(vec![
                    "A user with that username already exists.".to_string(),
                ]))
            }
            Err(other) => return Err(other.into()),
        };

        let session = self.sessions.create_session(user.id)?;
        log::info!(
            "event=signup module=auth status=ok user_id={}",
            user.id
        );
        Ok((user, session))
    }

    /// Verifies credentials and opens a new session.
    pub fn login(&self, username: &str, password: &str) -> Result<(User, Session), AuthError> {
        let Some(user) = self.users.find_by_username(username.trim())? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash) {
            log::info!(
                "event=login module=auth status=rejected user_id={}",
                user.id
            );
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.sessions.create_session(user.id)?;
        log::info!("event=login module=auth status=ok user_id={}", user.id);
        Ok((user, session))
    }

    /// Ends the session behind `token`. Unknown tokens are ignored.
    pub fn logout(&self, token: &str) -> Result<(), AuthError> {
        match self.sessions.delete_session(token) {
            Ok(()) | Err(RepoError::NotFound(_)) => Ok(()),
            Err(other) => Err(other.into()),
        }
    }

    /// Resolves a session token to its user, `None` for unknown or stale
    /// tokens.
    pub fn user_for_token(&self, token: &str) -> RepoResult<Option<User>> {
        let Some(user_id) = self.sessions.user_id_for_token(token)? else {
            return Ok(None);
        };
        self.users.find_by_id(user_id)
    }
}

fn validate_credentials(username: &str, password: &str, password_confirm: &str) -> Vec<String> {
    let mut problems = Vec::new();

    if username.is_empty() {
        problems.push("Username is required.".to_string());
    } else if username.chars().count() > USERNAME_MAX_CHARS {
        problems.push(format!(
            "Username must be {USERNAME_MAX_CHARS} characters or fewer."
        ));
    } else if !USERNAME_RE.is_match(username) {
        problems.push(
            "Username may contain only letters, digits and @/./+/-/_ characters.".to_string(),
        );
    }

    if password.chars().count() < PASSWORD_MIN_CHARS {
        problems.push(format!(
            "Password must contain at least {PASSWORD_MIN_CHARS} characters."
        ));
    } else if password.chars().all(|ch| ch.is_ascii_digit()) {
        problems.push("Password cannot be entirely numeric.".to_string());
    }

    if password != password_confirm {
        problems.push("The two password fields didn't match.".to_string());
    }

    problems
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::{hash_password, validate_credentials, verify_password};

    #[test]
    fn hash_round_trip_verifies_and_rejects() {
        let hash = hash_password("correct horse battery").expect("hashing should work");
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn credential_rules_collect_all_problems() {
        let problems = validate_credentials("bad name!", "1234", "5678");
        assert_eq!(problems.len(), 3);

        assert!(validate_credentials("fine_user", "long enough pw", "long enough pw").is_empty());
        assert_eq!(
            validate_credentials("fine_user", "123456789", "123456789"),
            vec!["Password cannot be entirely numeric.".to_string()]
        );
    }
}
