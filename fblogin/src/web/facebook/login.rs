use std::sync::Arc;

use {
    axum::{
        extract::{Extension, State},
        http::{header::LOCATION, StatusCode},
        response::{IntoResponse, Response},
    },
    tracing::{debug, warn},
    url::Url,
};

use crate::{
    model::{Authenticated, Context},
    Error,
};

use super::{Continuation, FacebookLogin, StateToken};

impl FacebookLogin {
    /// Facebook's authorization dialog URL for this client, carrying `state`.
    #[must_use]
    pub fn authorize_url(&self, state: &StateToken) -> Url {
        let csrf_token = state.to_csrf_token();
        let (url, _) = self
            .inner
            .client
            .authorize_url(move || csrf_token)
            .add_scopes(self.scopes())
            .url();
        url
    }
}

pub(crate) async fn login<S, F>(
    State(ctx): State<Arc<Context<S, F>>>,
    state: Option<Extension<StateToken>>,
) -> Response
where
    S: Continuation<Authenticated>,
    F: Continuation<Error>,
{
    let Some(Extension(state)) = state else {
        warn!("Login request reached the redirector without a state token");
        return ctx.failure.resume(Error::MissingState).await;
    };

    let url = ctx.facebook.authorize_url(&state);
    debug!("Redirecting to Facebook authorization dialog");
    (StatusCode::FOUND, [(LOCATION, url.as_str())]).into_response()
}
