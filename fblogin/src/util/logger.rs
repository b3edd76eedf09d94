use tracing::{info, subscriber::set_global_default, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::{util::config::Config, Error};

pub struct TracingLogger {
    _guard: WorkerGuard,
}

impl TracingLogger {
    fn new(level: Level) -> Result<Self, Error> {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());

        let subscriber = tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_max_level(level)
            .with_span_events(FmtSpan::CLOSE)
            .finish();

        set_global_default(subscriber).map_err(|e| Error::Logger(e.to_string()))?;

        Ok(Self { _guard: guard })
    }

    /// Installs the global subscriber. Keep the returned value alive for as
    /// long as logs should be flushed.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let verbosity = config.logger.verbosity;
        let logger = Self::new(verbosity.into())?;
        info!("Logger initialized with verbosity: {}", verbosity);
        Ok(logger)
    }
}
