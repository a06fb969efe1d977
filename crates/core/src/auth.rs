//! Admin authorization for mutating requests.
//!
//! Handlers never compare passwords themselves. They hand whatever the caller
//! supplied to an [`Authorizer`], which decides. [`SharedSecretAuthorizer`] is
//! the single-static-secret implementation used today.

use crate::error::CoreError;

/// Message returned to the client when the admin password is rejected.
pub const INVALID_PASSWORD_MESSAGE: &str = "Неверный пароль администратора";

/// Decides whether a mutating request may proceed.
pub trait Authorizer: Send + Sync {
    /// `supplied` is the credential the caller sent, or `None` if absent.
    fn authorize(&self, supplied: Option<&str>) -> Result<(), CoreError>;
}

/// Compares the supplied password with a server-held secret.
///
/// An empty secret denies every request unless `allow_empty` is set.
#[derive(Clone)]
pub struct SharedSecretAuthorizer {
    secret: String,
    allow_empty: bool,
}

impl SharedSecretAuthorizer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            allow_empty: false,
        }
    }

    /// Let an empty configured secret match an empty supplied password.
    pub fn allow_empty_secret(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}

impl std::fmt::Debug for SharedSecretAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecretAuthorizer")
            .field("secret", &"<redacted>")
            .field("allow_empty", &self.allow_empty)
            .finish()
    }
}

impl Authorizer for SharedSecretAuthorizer {
    fn authorize(&self, supplied: Option<&str>) -> Result<(), CoreError> {
        if self.secret.is_empty() && !self.allow_empty {
            return Err(CoreError::Forbidden(INVALID_PASSWORD_MESSAGE.into()));
        }

        match supplied {
            Some(password) if password == self.secret => Ok(()),
            None if self.secret.is_empty() => Ok(()),
            _ => Err(CoreError::Forbidden(INVALID_PASSWORD_MESSAGE.into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
