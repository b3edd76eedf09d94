use {
    axum::async_trait,
    oauth2::{
        basic::{BasicClient, BasicRequestTokenError},
        reqwest::{async_http_client, AsyncHttpClientError},
        AccessToken, AuthorizationCode, RequestTokenError, TokenResponse,
    },
    tracing::debug,
};

use crate::Error;

/// Trades an authorization code for an access token.
#[async_trait]
pub trait TokenExchanger: Send + Sync + 'static {
    async fn exchange(&self, code: AuthorizationCode) -> Result<AccessToken, Error>;
}

/// [`TokenExchanger`] backed by the `oauth2` crate's code grant.
#[derive(Debug, Clone)]
pub struct OAuth2Exchanger {
    client: BasicClient,
}

impl OAuth2Exchanger {
    #[must_use]
    pub const fn new(client: BasicClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenExchanger for OAuth2Exchanger {
    async fn exchange(&self, code: AuthorizationCode) -> Result<AccessToken, Error> {
        let token_res = self
            .client
            .exchange_code(code)
            .request_async(async_http_client)
            .await
            .map_err(|e| Error::TokenExchange(describe(&e)))?;

        debug!("Authorization code exchanged for access token");
        Ok(token_res.access_token().clone())
    }
}

fn describe(err: &BasicRequestTokenError<AsyncHttpClientError>) -> String {
    match err {
        RequestTokenError::ServerResponse(response) => response.to_string(),
        other => other.to_string(),
    }
}
