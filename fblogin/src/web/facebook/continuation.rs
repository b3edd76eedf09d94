use std::{future::Future, pin::Pin};

use axum::response::{IntoResponse, Response};

use crate::Error;

pub type ContinuationFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Application code resumed once a login step has finished, receiving either
/// the login or the error that ended it.
///
/// Implemented for any `Fn(T) -> impl Future<Output = impl IntoResponse>`
/// closure, so plain async closures work:
///
/// ```ignore
/// let success = |login: Authenticated| async move { format!("Hello {}", login.user.name) };
/// ```
pub trait Continuation<T>: Clone + Send + Sync + 'static {
    fn resume(&self, input: T) -> ContinuationFuture;
}

impl<T, F, Fut, R> Continuation<T> for F
where
    F: Fn(T) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn resume(&self, input: T) -> ContinuationFuture {
        let fut = self(input);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Failure continuation used when the application supplies none: answers
/// with the error's own response.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFailure;

impl Continuation<Error> for DefaultFailure {
    fn resume(&self, error: Error) -> ContinuationFuture {
        Box::pin(async move { error.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[tokio::test]
    async fn default_failure_is_bad_request_with_message() {
        let response = DefaultFailure.resume(Error::UnableToGetUser).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, "facebook: unable to get Facebook User");
    }

    #[tokio::test]
    async fn closures_are_continuations() {
        let failure = |err: Error| async move { (StatusCode::UNAUTHORIZED, err.to_string()) };
        let response = failure.resume(Error::InvalidState).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
