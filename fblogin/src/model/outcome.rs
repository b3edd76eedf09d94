use oauth2::AccessToken;

use crate::Error;

use super::User;

/// A completed login: the fetched profile and the bearer token that fetched it.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub access_token: AccessToken,
}

/// Result of processing a provider callback. Exactly one of a user or an error
/// reaches the continuations.
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(Authenticated),
    Failed(Error),
}

impl LoginOutcome {
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(login) => Some(&login.user),
            Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Authenticated(_) => None,
            Self::Failed(err) => Some(err),
        }
    }
}

impl From<Result<Authenticated, Error>> for LoginOutcome {
    fn from(result: Result<Authenticated, Error>) -> Self {
        match result {
            Ok(login) => Self::Authenticated(login),
            Err(err) => Self::Failed(err),
        }
    }
}
