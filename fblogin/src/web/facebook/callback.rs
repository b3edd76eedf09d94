use std::sync::Arc;

use {
    axum::{
        extract::{rejection::QueryRejection, Query, State},
        http::HeaderMap,
        response::Response,
    },
    oauth2::{AccessToken, AuthorizationCode},
    serde::Deserialize,
    tracing::{error, info, warn},
};

use crate::{
    model::{Authenticated, Context, LoginOutcome},
    Error,
};

use super::{state::append_cookie, validate_response, Continuation, FacebookLogin, StateToken};

/// Query parameters Facebook appends to the redirect URI.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Checks the returned state against the one remembered for this browser
    /// and yields the authorization code.
    fn verify(self, expected: Option<&StateToken>) -> Result<AuthorizationCode, Error> {
        if let Some(error) = self.error {
            return Err(Error::AuthorizationDenied {
                error,
                description: self.error_description.unwrap_or_default(),
            });
        }

        let code = self.code.filter(|code| !code.is_empty());
        let state = self.state.filter(|state| !state.is_empty());
        let (Some(code), Some(state)) = (code, state) else {
            return Err(Error::MissingCodeOrState);
        };

        let expected = expected.ok_or(Error::MissingState)?;
        if !expected.matches(&state) {
            return Err(Error::InvalidState);
        }

        Ok(AuthorizationCode::new(code))
    }
}

impl FacebookLogin {
    /// Runs the whole callback: state check, code exchange, profile fetch.
    pub async fn process_callback(
        &self,
        expected: Option<&StateToken>,
        params: CallbackParams,
    ) -> LoginOutcome {
        let access_token = match params.verify(expected) {
            Ok(code) => self.inner.exchanger.exchange(code).await,
            Err(err) => Err(err),
        };

        self.fetch_user(access_token).await.into()
    }

    /// Profile step of the callback. An earlier failure is passed through
    /// untouched and the profile endpoint is not called.
    pub async fn fetch_user(
        &self,
        access_token: Result<AccessToken, Error>,
    ) -> Result<Authenticated, Error> {
        let access_token = access_token?;
        let user = validate_response(self.inner.profile.me(&access_token).await)?;
        Ok(Authenticated { user, access_token })
    }
}

pub(crate) async fn callback<S, F>(
    State(ctx): State<Arc<Context<S, F>>>,
    headers: HeaderMap,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> Response
where
    S: Continuation<Authenticated>,
    F: Continuation<Error>,
{
    let issuer = ctx.facebook.state_issuer();
    let expected = issuer.read(&headers);

    let outcome = match query {
        Ok(Query(params)) => ctx.facebook.process_callback(expected.as_ref(), params).await,
        Err(rejection) => LoginOutcome::Failed(Error::InvalidCallback(rejection.body_text())),
    };

    let mut response = match outcome {
        LoginOutcome::Authenticated(login) => {
            info!("Facebook login succeeded for user {}", login.user.id);
            ctx.success.resume(login).await
        }
        LoginOutcome::Failed(err) => {
            warn!("Facebook login failed: {}", err);
            ctx.failure.resume(err).await
        }
    };

    if let Err(err) = append_cookie(response.headers_mut(), &issuer.removal_cookie()) {
        error!("Failed to clear state cookie: {}", err);
    }

    response
}
