use std::fmt::Display;

use {axum::http::StatusCode, tracing::debug};

use crate::{model::User, Error};

use super::profile::MeResponse;

/// Checks a profile fetch. Any failure, whatever its cause, becomes
/// [`Error::UnableToGetUser`]; the cause is only logged.
pub fn validate_response<E: Display>(fetched: Result<MeResponse, E>) -> Result<User, Error> {
    let me = fetched.map_err(|err| {
        debug!("Profile fetch failed: {}", err);
        Error::UnableToGetUser
    })?;

    if me.status != StatusCode::OK {
        debug!("Profile endpoint returned status {}", me.status);
        return Err(Error::UnableToGetUser);
    }

    match me.user {
        Some(user) if user.has_id() => Ok(user),
        _ => {
            debug!("Profile response has no user id");
            Err(Error::UnableToGetUser)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: "Ann".to_string(),
            ..Default::default()
        }
    }

    fn fetched(status: StatusCode, user: Option<User>) -> Result<MeResponse, &'static str> {
        Ok(MeResponse { status, user })
    }

    #[test]
    fn accepts_ok_with_id() {
        let user = validate_response(fetched(StatusCode::OK, Some(user("123")))).unwrap();
        assert_eq!(user.id, "123");
    }

    #[test]
    fn rejects_iff_any_condition_fails() {
        let statuses = [
            StatusCode::OK,
            StatusCode::CREATED,
            StatusCode::UNAUTHORIZED,
            StatusCode::INTERNAL_SERVER_ERROR,
        ];
        let users = [None, Some(user("")), Some(user("123"))];

        for failed in [false, true] {
            for status in statuses {
                for candidate in &users {
                    let input = if failed {
                        Err("connection reset")
                    } else {
                        fetched(status, candidate.clone())
                    };
                    let expect_valid = !failed
                        && status == StatusCode::OK
                        && candidate.as_ref().is_some_and(|u| !u.id.is_empty());

                    match validate_response(input) {
                        Ok(user) => {
                            assert!(expect_valid, "{status} {candidate:?} should be rejected");
                            assert_eq!(user.id, "123");
                        }
                        Err(err) => {
                            assert!(!expect_valid, "{status} {candidate:?} should be accepted");
                            assert!(matches!(err, Error::UnableToGetUser));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn is_idempotent() {
        let input = fetched(StatusCode::OK, Some(user("")));
        let first = validate_response(input.clone());
        let second = validate_response(input);
        assert_eq!(first.is_err(), second.is_err());

        let input = fetched(StatusCode::OK, Some(user("42")));
        assert_eq!(
            validate_response(input.clone()).unwrap(),
            validate_response(input).unwrap()
        );
    }
}
