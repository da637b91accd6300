//! HTTP route table
use crate::{api, middleware, state::AppState};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
///
/// `web_dir` is the built front-end. When set, unmatched paths serve the
/// file of that name or fall back to `index.html`; otherwise they are 404.
pub fn create_router(app_state: AppState, web_dir: Option<PathBuf>) -> Router {
    let auth_service = Arc::clone(&app_state.auth_service);

    let api_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/songs", get(api::catalog::list_songs))
        .route("/songs/:id", get(api::catalog::get_song))
        .route("/search", get(api::catalog::search))
        .route("/languages", get(api::catalog::languages));

    let auth_routes = Router::new()
        .route("/signup", post(api::auth::signup))
        .route("/login", post(api::auth::login))
        .merge(
            Router::new()
                .route("/me", get(api::auth::me))
                .layer(axum_middleware::from_fn_with_state(
                    auth_service,
                    middleware::auth_middleware,
                )),
        );

    let otp_routes = Router::new()
        .route("/send-otp-email", post(api::otp::send_email))
        .route("/verify-otp-email", post(api::otp::verify_email))
        .route("/send-otp-mobile", post(api::otp::send_mobile))
        .route("/verify-otp-mobile", post(api::otp::verify_mobile));

    let router = Router::new()
        .route("/healthz", get(api::health::healthz))
        .route("/download/:file", get(api::download::download))
        .nest("/api", api_routes)
        .nest("/auth", auth_routes)
        .nest("/otp", otp_routes);

    let router = match web_dir {
        Some(web_dir) => {
            router.fallback(move |req: Request<Body>| spa_fallback(web_dir.clone(), req))
        }
        None => router,
    };

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Serve a front-end file, or `index.html` for client-side routes
async fn spa_fallback(web_dir: PathBuf, req: Request<Body>) -> Response {
    let path = req.uri().path().trim_start_matches('/');
    let file_path = web_dir.join(path);

    if !path.is_empty() && file_path.is_file() {
        return match ServeDir::new(&web_dir).oneshot(req).await {
            Ok(res) => res.into_response(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };
    }

    match tokio::fs::read(web_dir.join("index.html")).await {
        Ok(contents) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            contents,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
