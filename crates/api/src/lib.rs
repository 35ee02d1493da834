//! # TutorSync API
//!
//! The API crate provides the web server for the TutorSync scheduling service.
//! It exposes RESTful endpoints for tutor availability, open-slot discovery and
//! the booking lifecycle.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Orchestrate the scheduling core against the storage ports
//! - **Middleware**: Provide cross-cutting concerns like error handling
//! - **Collaborators**: Default notifier and meeting-link implementations
//! - **Config**: Handle environment and application configuration
//!
//! Handlers never talk to a database directly; everything reaches storage and
//! side-effect services through the port traits in `tutorsync-core`, so the
//! same surface runs against Postgres in production and the in-memory store in
//! tests.

/// Default implementations of the outbound ports
pub mod collaborators;
/// Configuration module for API settings
pub mod config;
/// Request handlers that orchestrate the scheduling core
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use tutorsync_core::policy::SchedulingPolicy;
use tutorsync_core::ports::{AvailabilityStore, BookingLedger, MeetingLinkProvider, Notifier};

/// Shared application state that is accessible to all request handlers.
///
/// Storage and collaborator services are held behind their port traits so the
/// binary can wire in Postgres-backed implementations while tests substitute
/// in-memory ones.
pub struct ApiState {
    pub availability: Arc<dyn AvailabilityStore>,
    pub ledger: Arc<dyn BookingLedger>,
    pub notifier: Arc<dyn Notifier>,
    pub meeting_links: Arc<dyn MeetingLinkProvider>,
    pub policy: SchedulingPolicy,
}

/// Builds the application router with all routes attached to `state`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Weekly availability management
        .merge(routes::availability::routes())
        // Open-slot discovery
        .merge(routes::slots::routes())
        // Booking lifecycle endpoints
        .merge(routes::bookings::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and state.
///
/// Initializes logging, assembles the router and middleware stack, and serves
/// until the process is stopped.
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<axum::http::HeaderValue>()
                    .wrap_err_with(|| format!("Invalid CORS origin {origin:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(tower_http::cors::AllowOrigin::list(origins))
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request logging and timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout,
            ))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
