use fblogin::{
    axum::{
        http::StatusCode,
        response::{Html, IntoResponse},
        routing::get,
        Router,
    },
    tracing::warn,
    Authenticated, Config, Error,
};

pub fn build_home_router(config: &Config) -> Router {
    let login_path = config.facebook.routes.login.clone();

    Router::new().route(
        "/",
        get(move || async move {
            Html(format!(
                r#"<p><a href="{login_path}">Log in with Facebook</a></p>"#
            ))
        }),
    )
}

pub async fn welcome(login: Authenticated) -> impl IntoResponse {
    let user = login.user;
    let email = user.email.as_deref().unwrap_or("no email shared");
    Html(format!(
        "<p>Welcome {}! Your Facebook id is {} ({}).</p>",
        escape(&user.name),
        escape(&user.id),
        escape(email)
    ))
}

pub async fn login_failed(err: Error) -> impl IntoResponse {
    warn!("Showing login failure page: {}", err);
    (
        StatusCode::UNAUTHORIZED,
        Html(format!(
            r#"<p>Login failed: {}</p><p><a href="/">Try again</a></p>"#,
            escape(&err.to_string())
        )),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
