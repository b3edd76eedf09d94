use std::{env, net::IpAddr, path::Path};

use {
    derivative::Derivative,
    figment::{
        providers::{Env, Format, Toml},
        Figment,
    },
    serde::{Deserialize, Serialize},
    serde_json::Value,
    strum::Display,
    tracing::Level,
};

use crate::{util::token_expander::expand_tokens, Error};

pub const ENV_PREFIX: &str = "FBLOGIN_";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LoggerConfig {
    pub verbosity: Verbosity,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum Verbosity {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<Verbosity> for Level {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Trace => Self::TRACE,
            Verbosity::Debug => Self::DEBUG,
            Verbosity::Info => Self::INFO,
            Verbosity::Warn => Self::WARN,
            Verbosity::Error => Self::ERROR,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct Website {
    #[derivative(Default(value = "IpAddr::from([127, 0, 0, 1])"))]
    pub bind_address: IpAddr,
    #[derivative(Default(value = "8080"))]
    pub bind_port: u16,
    #[derivative(Default(value = "\"http://localhost:8080\".into()"))]
    pub public_url: String,
}

impl Website {
    pub fn format_public_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.public_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum SameSiteConfig {
    Strict,
    #[default]
    Lax,
    None,
}

impl From<SameSiteConfig> for cookie::SameSite {
    fn from(policy: SameSiteConfig) -> Self {
        match policy {
            SameSiteConfig::Strict => Self::Strict,
            SameSiteConfig::Lax => Self::Lax,
            SameSiteConfig::None => Self::None,
        }
    }
}

/// Settings for the short-lived cookie carrying the CSRF state between the
/// login redirect and the provider callback.
#[derive(Debug, Serialize, Deserialize, Derivative, Clone, PartialEq, Eq)]
#[derivative(Default)]
#[serde(default)]
pub struct StateCookieConfig {
    #[derivative(Default(value = "\"fblogin-state\".into()"))]
    pub name: String,
    #[derivative(Default(value = "\"/\".into()"))]
    pub path: String,
    pub domain: Option<String>,
    #[derivative(Default(value = "60"))]
    pub max_age_secs: i64,
    #[derivative(Default(value = "true"))]
    pub http_only: bool,
    #[derivative(Default(value = "true"))]
    pub secure: bool,
    pub same_site: SameSiteConfig,
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone, PartialEq, Eq)]
#[derivative(Default)]
#[serde(default)]
pub struct FacebookRoutes {
    #[derivative(Default(value = "\"/facebook/login\".into()"))]
    pub login: String,
    #[derivative(Default(value = "\"/facebook/callback\".into()"))]
    pub callback: String,
}

/// OAuth2 client settings for Facebook. The endpoints default to Facebook's
/// own and only need overriding to target a different Graph API version.
#[derive(Serialize, Deserialize, Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug, Default)]
#[serde(default)]
pub struct FacebookConfig {
    pub client_id: String,
    #[derivative(Debug = "ignore")]
    pub client_secret: String,
    pub redirect_uri: String,
    #[derivative(Default(value = "vec![\"public_profile\".into(), \"email\".into()]"))]
    pub scopes: Vec<String>,
    #[derivative(Default(value = "\"https://www.facebook.com/dialog/oauth\".into()"))]
    pub auth_uri: String,
    #[derivative(Default(value = "\"https://graph.facebook.com/oauth/access_token\".into()"))]
    pub token_uri: String,
    #[derivative(Default(
        value = "\"https://graph.facebook.com/me?fields=id,name,email,first_name,last_name\".into()"
    ))]
    pub userinfo_uri: String,
    /// Timeout for each outbound call to Facebook; 0 disables it.
    #[derivative(Default(value = "10"))]
    pub timeout_secs: u64,
    pub state_cookie: StateCookieConfig,
    pub routes: FacebookRoutes,
}

#[derive(Debug, Serialize, Deserialize, Derivative, Clone)]
#[derivative(Default)]
#[serde(default)]
pub struct Config {
    #[derivative(Default(value = "default_run_mode()"))]
    pub run_mode: String,
    pub logger: LoggerConfig,
    pub website: Website,
    pub facebook: FacebookConfig,
}

fn default_run_mode() -> String {
    "dev".to_string()
}

impl Config {
    pub fn load(config_dir: impl AsRef<Path>) -> Result<Self, Error> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| default_run_mode());
        Self::load_with_run_mode(config_dir, &run_mode)
    }

    pub fn load_with_run_mode(config_dir: impl AsRef<Path>, run_mode: &str) -> Result<Self, Error> {
        let figment = Self::figment_with_paths(config_dir.as_ref(), run_mode);

        let mut config: Self = figment.extract()?;
        config.run_mode = run_mode.to_string();

        let config_value = serde_json::to_value(&config)?;
        let expanded: Value = expand_tokens(&config_value);
        Ok(serde_json::from_value(expanded)?)
    }

    pub fn figment_with_paths(config_dir: &Path, run_mode: &str) -> Figment {
        let default_path = config_dir.join("default.toml");
        let local_path = config_dir.join("local.toml");
        let run_mode_path = config_dir.join(format!("{run_mode}.toml"));

        let mut figment = Figment::new().merge(Toml::file(default_path));

        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }
        if run_mode_path.exists() {
            figment = figment.merge(Toml::file(run_mode_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn facebook_defaults() {
        let facebook = FacebookConfig::default();
        assert_eq!(facebook.auth_uri, "https://www.facebook.com/dialog/oauth");
        assert_eq!(
            facebook.token_uri,
            "https://graph.facebook.com/oauth/access_token"
        );
        assert!(facebook.userinfo_uri.starts_with("https://graph.facebook.com/me"));
        assert_eq!(facebook.scopes, vec!["public_profile", "email"]);
        assert_eq!(facebook.routes.login, "/facebook/login");
        assert_eq!(facebook.routes.callback, "/facebook/callback");
        assert_eq!(facebook.state_cookie.max_age_secs, 60);
        assert!(facebook.state_cookie.http_only);
        assert_eq!(facebook.state_cookie.same_site, SameSiteConfig::Lax);
    }

    #[test]
    fn debug_output_hides_client_secret() {
        let facebook = FacebookConfig {
            client_secret: "very-secret".to_string(),
            ..Default::default()
        };
        assert!(!format!("{facebook:?}").contains("very-secret"));
    }

    #[test]
    fn format_public_url_joins_paths() {
        let website = Website {
            public_url: "https://example.com/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            website.format_public_url("/facebook/callback"),
            "https://example.com/facebook/callback"
        );
    }

    #[test]
    fn deserialization_of_partial_facebook_section() {
        let json = r#"
        {
            "facebook": {
                "client_id": "app-id",
                "client_secret": "app-secret",
                "scopes": ["public_profile"]
            }
        }"#;

        let config: Config = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(config.facebook.client_id, "app-id");
        assert_eq!(config.facebook.scopes, vec!["public_profile"]);
        assert_eq!(config.facebook.routes.login, "/facebook/login");
        assert_eq!(config.run_mode, "dev");
    }

    #[test]
    fn load_layers_files_and_expands_tokens() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(
            dir.path().join("default.toml"),
            r#"
            [logger]
            verbosity = "Debug"

            [website]
            public_url = "https://login.example.com"

            [facebook]
            client_id = "app-id"
            client_secret = "app-secret"
            redirect_uri = "${website.public_url}${facebook.routes.callback}"
            "#,
        )
        .expect("Failed to write default.toml");
        fs::write(
            dir.path().join("test.toml"),
            r#"
            [facebook.routes]
            callback = "/auth/facebook/callback"
            "#,
        )
        .expect("Failed to write test.toml");

        let config = Config::load_with_run_mode(dir.path(), "test").expect("Failed to load");
        assert_eq!(config.run_mode, "test");
        assert_eq!(config.logger.verbosity, Verbosity::Debug);
        assert_eq!(
            config.facebook.redirect_uri,
            "https://login.example.com/auth/facebook/callback"
        );
    }

    #[test]
    fn environment_overrides_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "default.toml",
                r#"
                [facebook]
                client_id = "from-file"
                "#,
            )?;
            jail.set_env("FBLOGIN_FACEBOOK__CLIENT_ID", "from-env");
            jail.set_env("FBLOGIN_FACEBOOK__STATE_COOKIE__SECURE", "false");

            let config = Config::load_with_run_mode(jail.directory(), "dev")
                .map_err(|e| e.to_string())?;
            assert_eq!(config.facebook.client_id, "from-env");
            assert!(!config.facebook.state_cookie.secure);
            Ok(())
        });
    }
}
