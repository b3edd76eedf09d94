mod config;
pub use config::{
    Config, FacebookConfig, FacebookRoutes, LoggerConfig, SameSiteConfig, StateCookieConfig,
    Verbosity, Website, ENV_PREFIX,
};

mod logger;
pub use logger::TracingLogger;

pub(crate) mod http;

mod token_expander;
