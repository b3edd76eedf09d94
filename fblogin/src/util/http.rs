use {
    axum::{extract::Request, Router},
    hyper::body::Incoming,
    hyper_util::{
        rt::{TokioExecutor, TokioIo},
        server::conn::auto::Builder as AutoBuilder,
    },
    tokio::net::TcpListener,
    tower::ServiceExt,
    tracing::{debug, error},
};

/// Accepts connections on `listener` until the task is dropped, serving each
/// one with `router` over HTTP/1 or HTTP/2.
pub async fn serve_http(listener: TcpListener, router: Router) {
    debug!("Starting HTTP accept loop");

    loop {
        match listener.accept().await {
            Ok((stream, remote_addr)) => {
                let io = TokioIo::new(stream);
                let router = router.clone();

                tokio::task::spawn(async move {
                    let service = hyper::service::service_fn(move |req: Request<Incoming>| {
                        router.clone().oneshot(req)
                    });

                    if let Err(err) = AutoBuilder::new(TokioExecutor::new())
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", remote_addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {:?}", e);
            }
        }
    }
}
