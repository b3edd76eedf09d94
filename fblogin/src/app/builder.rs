use std::sync::Arc;

use {axum::Router, tracing::debug};

use crate::{
    model::Authenticated,
    util::Config,
    web::facebook::{Continuation, DefaultFailure, FacebookLogin, LoginRoutes},
    Error,
};

use super::server::Server;

pub struct Builder<S, F = DefaultFailure> {
    config: Arc<Config>,
    facebook: FacebookLogin,
    router: Router,
    success: S,
    failure: F,
}

impl<S> Builder<S>
where
    S: Continuation<Authenticated>,
{
    /// # Errors
    ///
    /// Returns an error if the `facebook` section of the config is invalid.
    pub fn new(config: Config, success: S) -> Result<Self, Error> {
        debug!("Initializing Builder with config: {:?}", config);

        let facebook = FacebookLogin::from_config(&config.facebook)?;

        Ok(Self {
            config: Arc::new(config),
            facebook,
            router: Router::new(),
            success,
            failure: DefaultFailure,
        })
    }
}

impl<S, F> Builder<S, F>
where
    S: Continuation<Authenticated>,
    F: Continuation<Error>,
{
    #[must_use]
    pub fn with_failure<G>(self, failure: G) -> Builder<S, G>
    where
        G: Continuation<Error>,
    {
        Builder {
            config: self.config,
            facebook: self.facebook,
            router: self.router,
            success: self.success,
            failure,
        }
    }

    /// Replaces the login pipeline, e.g. to plug in a custom token exchange.
    #[must_use]
    pub fn with_facebook(mut self, facebook: FacebookLogin) -> Self {
        self.facebook = facebook;
        self
    }

    /// Merges application routes next to the login routes.
    #[must_use]
    pub fn with_router<R>(mut self, build: R) -> Self
    where
        R: FnOnce(&Config) -> Router,
    {
        self.router = self.router.merge(build(&self.config));
        self
    }

    #[must_use]
    pub fn build(self) -> Server {
        debug!("Building server");

        let login_router = LoginRoutes::new(self.facebook, self.success)
            .with_failure(self.failure)
            .into_router();

        Server {
            router: self.router.merge(login_router),
            config: self.config,
        }
    }
}
