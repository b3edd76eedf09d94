//! Login with Facebook.
//!
//! The chain is made of three pieces: [`issue_state`] makes sure a CSRF state
//! cookie exists, the login handler redirects to Facebook's authorization
//! dialog with that state, and the callback handler checks the state,
//! exchanges the code, fetches the user and resumes the application through a
//! success or failure [`Continuation`]. [`LoginRoutes`] wires them into a
//! router.

use std::sync::Arc;

use {
    axum::{middleware, routing::get, Router},
    oauth2::{basic::BasicClient, AuthType, AuthUrl, ClientId, ClientSecret, RedirectUrl, Scope, TokenUrl},
    tracing::debug,
};

use crate::{
    core::LoginRouter,
    model::{Authenticated, Context},
    util::{FacebookConfig, FacebookRoutes},
    Error,
};

mod callback;
pub use callback::CallbackParams;

mod continuation;
pub use continuation::{Continuation, ContinuationFuture, DefaultFailure};

mod exchange;
pub use exchange::{OAuth2Exchanger, TokenExchanger};

mod login;

mod profile;
pub use profile::{MeResponse, ProfileClient, ProfileError};

mod state;
pub use state::{issue_state, IssuedState, StateIssuer, StateToken};

mod validate;
pub use validate::validate_response;

/// The configured login pipeline. Cheap to clone.
#[derive(Clone)]
pub struct FacebookLogin {
    inner: Arc<Inner>,
}

struct Inner {
    config: FacebookConfig,
    client: BasicClient,
    exchanger: Arc<dyn TokenExchanger>,
    profile: ProfileClient,
    issuer: StateIssuer,
}

impl std::fmt::Debug for FacebookLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacebookLogin")
            .field("config", &self.inner.config)
            .field("profile", &self.inner.profile)
            .finish_non_exhaustive()
    }
}

impl FacebookLogin {
    /// Builds the pipeline with the `oauth2`-backed token exchange.
    ///
    /// # Errors
    ///
    /// Returns an error when a required setting is empty or an endpoint is not
    /// a valid URL.
    pub fn from_config(config: &FacebookConfig) -> Result<Self, Error> {
        let client = oauth_client(config)?;
        let exchanger = OAuth2Exchanger::new(client.clone());
        Self::build(config, client, Arc::new(exchanger))
    }

    /// Builds the pipeline around a custom token exchange.
    ///
    /// # Errors
    ///
    /// Same as [`FacebookLogin::from_config`].
    pub fn with_exchanger<E: TokenExchanger>(
        config: &FacebookConfig,
        exchanger: E,
    ) -> Result<Self, Error> {
        let client = oauth_client(config)?;
        Self::build(config, client, Arc::new(exchanger))
    }

    fn build(
        config: &FacebookConfig,
        client: BasicClient,
        exchanger: Arc<dyn TokenExchanger>,
    ) -> Result<Self, Error> {
        validate_routes(&config.routes)?;
        let profile = ProfileClient::from_config(config)?;
        let issuer = StateIssuer::new(config.state_cookie.clone());

        debug!("Facebook login configured for client {}", config.client_id);
        Ok(Self {
            inner: Arc::new(Inner {
                config: config.clone(),
                client,
                exchanger,
                profile,
                issuer,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &FacebookConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn state_issuer(&self) -> &StateIssuer {
        &self.inner.issuer
    }

    fn scopes(&self) -> impl Iterator<Item = Scope> + '_ {
        self.inner.config.scopes.iter().cloned().map(Scope::new)
    }
}

fn validate_routes(routes: &FacebookRoutes) -> Result<(), Error> {
    for (key, path) in [("login", &routes.login), ("callback", &routes.callback)] {
        if !path.starts_with('/') {
            return Err(Error::Config(format!(
                "facebook.routes.{key} must start with '/', got '{path}'"
            )));
        }
    }
    if routes.login == routes.callback {
        return Err(Error::Config(format!(
            "facebook.routes.login and facebook.routes.callback are both '{}'",
            routes.login
        )));
    }
    Ok(())
}

fn oauth_client(config: &FacebookConfig) -> Result<BasicClient, Error> {
    if config.client_id.is_empty() {
        return Err(Error::Config("facebook.client_id must be set".to_string()));
    }
    if config.client_secret.is_empty() {
        return Err(Error::Config("facebook.client_secret must be set".to_string()));
    }

    let auth_url = AuthUrl::new(config.auth_uri.clone()).map_err(|inner| Error::InvalidAuthUrl {
        url: config.auth_uri.clone(),
        inner,
    })?;
    let token_url =
        TokenUrl::new(config.token_uri.clone()).map_err(|inner| Error::InvalidTokenUrl {
            url: config.token_uri.clone(),
            inner,
        })?;
    let redirect_url =
        RedirectUrl::new(config.redirect_uri.clone()).map_err(|inner| Error::InvalidRedirectUrl {
            url: config.redirect_uri.clone(),
            inner,
        })?;

    // Facebook expects the client credentials as form parameters.
    Ok(BasicClient::new(
        ClientId::new(config.client_id.clone()),
        Some(ClientSecret::new(config.client_secret.clone())),
        auth_url,
        Some(token_url),
    )
    .set_redirect_uri(redirect_url)
    .set_auth_type(AuthType::RequestBody))
}

/// Routes for the login and callback handlers, resuming the application with
/// `success` or `failure`.
pub struct LoginRoutes<S, F = DefaultFailure> {
    facebook: FacebookLogin,
    success: S,
    failure: F,
}

impl<S> LoginRoutes<S>
where
    S: Continuation<Authenticated>,
{
    #[must_use]
    pub fn new(facebook: FacebookLogin, success: S) -> Self {
        Self {
            facebook,
            success,
            failure: DefaultFailure,
        }
    }
}

impl<S, F> LoginRoutes<S, F>
where
    S: Continuation<Authenticated>,
    F: Continuation<Error>,
{
    #[must_use]
    pub fn with_failure<G>(self, failure: G) -> LoginRoutes<S, G>
    where
        G: Continuation<Error>,
    {
        LoginRoutes {
            facebook: self.facebook,
            success: self.success,
            failure,
        }
    }

    /// The login route issues the state cookie before redirecting; the
    /// callback route only reads it.
    pub fn into_router(self) -> Router {
        let routes = self.facebook.config().routes.clone();
        let issuer = self.facebook.state_issuer().clone();
        let context = Arc::new(Context {
            facebook: self.facebook,
            success: self.success,
            failure: self.failure,
        });

        let router: LoginRouter<S, F> = Router::new()
            .route(
                &routes.login,
                get(login::login::<S, F>)
                    .layer(middleware::from_fn_with_state(issuer, issue_state)),
            )
            .route(&routes.callback, get(callback::callback::<S, F>));

        router.with_state(context)
    }
}
