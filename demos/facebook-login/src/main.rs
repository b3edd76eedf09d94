mod pages;

use {
    fblogin::{tracing::info, Builder, Config, Error, TracingLogger},
    tokio::signal,
};

use pages::{build_home_router, welcome};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load("demos/facebook-login/config")?;

    let _logger_guard = TracingLogger::from_config(&config)?;

    let server = Builder::new(config, welcome)?
        .with_failure(pages::login_failed)
        .with_router(build_home_router)
        .build();

    let addr = server.start().await?;
    info!("Demo listening on http://{}", addr);

    signal::ctrl_c().await?;
    info!("Server shutdown gracefully");

    Ok(())
}
