//! # Canvass
//!
//! Survey creation and response-collection backend.
//!
//!
//!
//! # General Infrastructure
//! - Browser clients author surveys and view results through this API
//! - Surveys live in MongoDB as documents; each submission is one
//!   append-only `Response` document
//! - Respondents are never authenticated: the server records best-effort
//!   signals (network address, user agent, optional session token) purely
//!   as deduplication hints
//!
//!
//!
//! # Duplicate Submissions
//!
//! **Goal**: surface repeat submissions without ever rejecting one.
//!
//! - The `responses` collection has a non-unique index on
//!   `(surveyId, respondentInfo.ipAddress)`
//! - `GET /surveys/{id}/responses/check?ip=...` runs the candidate lookup so
//!   a client can warn the respondent
//! - The insert path does not consult it; two submissions from one address
//!   both persist
//!
//!
//!
//! # Setup
//!
//! Environment:
//! ```sh
//! RUST_PORT=3000
//! MONGO_URL=mongodb://localhost:27017
//! MONGO_DB=canvass
//! API_BASE_URL=https://api.example.com
//! ```
//!
//! Log filtering uses `RUST_LOG`.
//! ```sh
//! RUST_LOG=info cargo run
//! ```
use std::{net::SocketAddr, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod validation;

use routes::{
    auth_url_handler, check_duplicates_handler, create_survey_handler, delete_survey_handler,
    get_survey_handler, list_responses_handler, list_surveys_handler, submit_response_handler,
    update_survey_handler,
};
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route(
            "/surveys",
            post(create_survey_handler).get(list_surveys_handler),
        )
        .route(
            "/surveys/{id}",
            get(get_survey_handler)
                .put(update_survey_handler)
                .delete(delete_survey_handler),
        )
        .route(
            "/surveys/{id}/responses",
            post(submit_response_handler).get(list_responses_handler),
        )
        .route("/surveys/{id}/responses/check", get(check_duplicates_handler))
        .route("/auth/google", get(auth_url_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
