use {
    axum::{
        extract::{Request, State},
        http::{
            header::{COOKIE, SET_COOKIE},
            HeaderMap, HeaderValue,
        },
        middleware::Next,
        response::{IntoResponse, Response},
    },
    cookie::Cookie,
    oauth2::CsrfToken,
    tracing::{debug, error},
};

use crate::{util::StateCookieConfig, Error};

const STATE_LEN: u32 = 32;

/// The anti-CSRF value binding a login redirect to its callback.
#[derive(Debug, Clone)]
pub struct StateToken(CsrfToken);

impl StateToken {
    #[must_use]
    pub fn new(secret: String) -> Self {
        Self(CsrfToken::new(secret))
    }

    #[must_use]
    pub fn new_random() -> Self {
        Self(CsrfToken::new_random_len(STATE_LEN))
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        self.0.secret()
    }

    #[must_use]
    pub fn matches(&self, returned: &str) -> bool {
        self.secret() == returned
    }

    pub(crate) fn to_csrf_token(&self) -> CsrfToken {
        self.0.clone()
    }
}

/// A state token together with the cookie that must be set to remember it,
/// if it was freshly generated.
#[derive(Debug, Clone)]
pub struct IssuedState {
    pub token: StateToken,
    pub cookie: Option<Cookie<'static>>,
}

#[derive(Debug, Clone)]
pub struct StateIssuer {
    config: StateCookieConfig,
}

impl StateIssuer {
    #[must_use]
    pub const fn new(config: StateCookieConfig) -> Self {
        Self { config }
    }

    /// Reads the state token from the request's cookies. Empty values count as
    /// absent.
    #[must_use]
    pub fn read(&self, headers: &HeaderMap) -> Option<StateToken> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == self.config.name && !cookie.value().is_empty())
            .map(|cookie| StateToken::new(cookie.value().to_string()))
    }

    #[must_use]
    pub fn issue_or_read(&self, headers: &HeaderMap) -> IssuedState {
        if let Some(token) = self.read(headers) {
            debug!("Reusing state from cookie {}", self.config.name);
            return IssuedState {
                token,
                cookie: None,
            };
        }

        let token = StateToken::new_random();
        let cookie = self.cookie(token.secret().to_string());
        debug!("Issued new state cookie {}", self.config.name);
        IssuedState {
            token,
            cookie: Some(cookie),
        }
    }

    #[must_use]
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.cookie(String::new());
        cookie.make_removal();
        cookie
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        let mut builder = Cookie::build((self.config.name.clone(), value))
            .path(self.config.path.clone())
            .http_only(self.config.http_only)
            .secure(self.config.secure)
            .same_site(self.config.same_site.into())
            .max_age(time::Duration::seconds(self.config.max_age_secs));

        if let Some(domain) = &self.config.domain {
            builder = builder.domain(domain.clone());
        }

        builder.build()
    }
}

pub(crate) fn append_cookie(headers: &mut HeaderMap, cookie: &Cookie<'_>) -> Result<(), Error> {
    headers.append(SET_COOKIE, HeaderValue::from_str(&cookie.to_string())?);
    Ok(())
}

/// Middleware making a [`StateToken`] available to the wrapped handler as a
/// request extension, setting the state cookie when it had to be created.
pub async fn issue_state(
    State(issuer): State<StateIssuer>,
    mut request: Request,
    next: Next,
) -> Response {
    let IssuedState { token, cookie } = issuer.issue_or_read(request.headers());
    request.extensions_mut().insert(token);

    let mut response = next.run(request).await;

    if let Some(cookie) = cookie {
        if let Err(err) = append_cookie(response.headers_mut(), &cookie) {
            error!("Failed to set state cookie: {}", err);
            return err.into_response();
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        extract::Extension,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use super::*;

    fn issuer() -> StateIssuer {
        StateIssuer::new(StateCookieConfig::default())
    }

    fn cookie_header(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn issues_cookie_when_absent() {
        let issued = issuer().issue_or_read(&HeaderMap::new());

        let cookie = issued.cookie.expect("a new cookie");
        assert_eq!(cookie.name(), "fblogin-state");
        assert_eq!(cookie.value(), issued.token.secret());
        assert!(!issued.token.secret().is_empty());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(60)));
    }

    #[test]
    fn reuses_existing_cookie() {
        let headers = cookie_header("other=1; fblogin-state=abc123");
        let issued = issuer().issue_or_read(&headers);

        assert!(issued.cookie.is_none());
        assert_eq!(issued.token.secret(), "abc123");
    }

    #[test]
    fn empty_cookie_is_replaced() {
        let headers = cookie_header("fblogin-state=");
        let issued = issuer().issue_or_read(&headers);

        assert!(issued.cookie.is_some());
        assert!(!issued.token.secret().is_empty());
    }

    #[test]
    fn fresh_tokens_differ() {
        let first = issuer().issue_or_read(&HeaderMap::new());
        let second = issuer().issue_or_read(&HeaderMap::new());
        assert_ne!(first.token.secret(), second.token.secret());
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = issuer().removal_cookie();
        assert_eq!(cookie.name(), "fblogin-state");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }

    fn echo_router() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(token): Extension<StateToken>| async move {
                    token.secret().to_string()
                }),
            )
            .layer(middleware::from_fn_with_state(issuer(), issue_state))
    }

    #[tokio::test]
    async fn middleware_sets_exactly_one_cookie_and_reuses_it() {
        let response = echo_router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(set_cookies.len(), 1);
        let cookie = Cookie::parse(set_cookies[0].to_str().unwrap().to_string()).unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, cookie.value().as_bytes());

        let replay = Request::get("/")
            .header(COOKIE, format!("fblogin-state={}", cookie.value()))
            .body(Body::empty())
            .unwrap();
        let response = echo_router().oneshot(replay).await.unwrap();
        assert!(response.headers().get(SET_COOKIE).is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, cookie.value().as_bytes());
    }
}
