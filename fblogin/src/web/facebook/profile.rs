use std::time::Duration;

use {
    axum::http::StatusCode,
    oauth2::AccessToken,
    reqwest::header::ACCEPT,
    tracing::debug,
    url::Url,
};

use crate::{model::User, util::FacebookConfig, Error};

const USER_AGENT: &str = concat!("fblogin/", env!("CARGO_PKG_VERSION"));

/// What the "me" endpoint answered: the raw status, and the profile when the
/// status was a success.
#[derive(Debug, Clone)]
pub struct MeResponse {
    pub status: StatusCode,
    pub user: Option<User>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("request to the me endpoint failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed me response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the Graph API endpoint describing the token's owner.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    http: reqwest::Client,
    me_url: Url,
}

impl ProfileClient {
    #[must_use]
    pub const fn new(http: reqwest::Client, me_url: Url) -> Self {
        Self { http, me_url }
    }

    /// # Errors
    ///
    /// Returns an error when `userinfo_uri` is not a valid URL or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &FacebookConfig) -> Result<Self, Error> {
        let me_url = Url::parse(&config.userinfo_uri).map_err(|inner| Error::InvalidUserinfoUrl {
            url: config.userinfo_uri.clone(),
            inner,
        })?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let http = builder.build().map_err(Error::HttpClient)?;

        Ok(Self::new(http, me_url))
    }

    #[must_use]
    pub const fn me_url(&self) -> &Url {
        &self.me_url
    }

    pub async fn me(&self, access_token: &AccessToken) -> Result<MeResponse, ProfileError> {
        let response = self
            .http
            .get(self.me_url.clone())
            .bearer_auth(access_token.secret())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!("Profile endpoint answered {}", status);
        if !status.is_success() {
            return Ok(MeResponse { status, user: None });
        }

        let body = response.bytes().await?;
        let user = serde_json::from_slice(&body)?;
        Ok(MeResponse {
            status,
            user: Some(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_me_url() {
        let config = FacebookConfig {
            userinfo_uri: "not a url".to_string(),
            ..Default::default()
        };

        let err = ProfileClient::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::InvalidUserinfoUrl { .. }));
    }

    #[test]
    fn keeps_fields_query() {
        let client = ProfileClient::from_config(&FacebookConfig::default()).unwrap();
        assert_eq!(client.me_url().host_str(), Some("graph.facebook.com"));
        assert_eq!(client.me_url().path(), "/me");
        assert!(client.me_url().query().unwrap_or_default().contains("fields=id"));
    }
}
