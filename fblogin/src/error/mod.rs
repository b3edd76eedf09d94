use axum::{
    http::{header::InvalidHeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use url::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("facebook: unable to get Facebook User")]
    UnableToGetUser,

    #[error("oauth2: request missing state value")]
    MissingState,

    #[error("oauth2: invalid OAuth2 state parameter")]
    InvalidState,

    #[error("oauth2: request missing code or state")]
    MissingCodeOrState,

    #[error("oauth2: invalid callback request: {0}")]
    InvalidCallback(String),

    #[error("oauth2: authorization denied: {error} ({description})")]
    AuthorizationDenied { error: String, description: String },

    #[error("oauth2: token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Invalid authorization URL '{url}': {inner}")]
    InvalidAuthUrl { url: String, inner: ParseError },

    #[error("Invalid token URL '{url}': {inner}")]
    InvalidTokenUrl { url: String, inner: ParseError },

    #[error("Invalid redirect URL '{url}': {inner}")]
    InvalidRedirectUrl { url: String, inner: ParseError },

    #[error("Invalid userinfo URL '{url}': {inner}")]
    InvalidUserinfoUrl { url: String, inner: ParseError },

    #[error("HTTP client error: {0}")]
    HttpClient(reqwest::Error),

    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Logger error: {0}")]
    Logger(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by the login attempt itself rather than by
    /// a misconfigured or failing server.
    #[must_use]
    pub const fn is_login_failure(&self) -> bool {
        matches!(
            self,
            Self::UnableToGetUser
                | Self::MissingState
                | Self::InvalidState
                | Self::MissingCodeOrState
                | Self::InvalidCallback(_)
                | Self::AuthorizationDenied { .. }
                | Self::TokenExchange(_)
        )
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_login_failure() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.to_string()).into_response()
    }
}
