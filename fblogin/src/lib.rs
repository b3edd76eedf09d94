mod app;
mod core;
mod error;
pub mod model;
mod util;
pub mod web;

pub use {
    app::{Builder, Server},
    axum,
    error::Error,
    model::{Authenticated, LoginOutcome, User},
    oauth2,
    tracing,
    util::{
        Config, FacebookConfig, FacebookRoutes, LoggerConfig, SameSiteConfig, StateCookieConfig,
        TracingLogger, Verbosity, Website, ENV_PREFIX,
    },
    web::facebook::{
        issue_state, validate_response, CallbackParams, Continuation, DefaultFailure,
        FacebookLogin, LoginRoutes, MeResponse, OAuth2Exchanger, ProfileClient, ProfileError,
        StateIssuer, StateToken, TokenExchanger,
    },
};
