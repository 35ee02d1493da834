//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the TutorSync API
//! server. It retrieves configuration values from environment variables and
//! provides defaults where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `MEETING_LINK_BASE_URL`: Base URL for generated meeting links
//! - `SLOT_GRANULARITY_MINUTES`: Spacing between offered slot starts (default: 15)
//! - `MIN_SESSION_MINUTES`: Shortest bookable session (default: 30)
//! - `MAX_SESSION_MINUTES`: Longest bookable session (default: 240)
//! - `CANCELLATION_NOTICE_HOURS`: Required cancellation lead time (default: 24)
//! - `BOOKING_BUFFER_MINUTES`: Gap enforced after sessions when listing slots (default: 0)

use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;
use tutorsync_core::policy::SchedulingPolicy;

/// Configuration for the TutorSync API server.
///
/// Encapsulates networking, database, logging and scheduling-policy settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Base URL meeting links are minted under
    pub meeting_link_base_url: String,

    /// Scheduling rules shared by slot generation and booking admission
    pub policy: SchedulingPolicy,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables.
    ///
    /// Loads configuration values from environment variables, providing
    /// sensible defaults where possible. `DATABASE_URL` is required and will
    /// cause an error if not set. Malformed policy knobs fall back to their
    /// defaults rather than failing startup.
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = match env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .map(|origins| origins.split(',').map(|s| s.trim().to_string()).collect());

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Collaborator settings
        let meeting_link_base_url = env::var("MEETING_LINK_BASE_URL")
            .unwrap_or_else(|_| "https://meet.tutorsync.example".to_string());

        // Scheduling policy knobs
        let defaults = SchedulingPolicy::default();
        let policy = SchedulingPolicy {
            slot_granularity_minutes: env::var("SLOT_GRANULARITY_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.slot_granularity_minutes),
            min_session_minutes: env::var("MIN_SESSION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_session_minutes),
            max_session_minutes: env::var("MAX_SESSION_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_session_minutes),
            cancellation_notice_hours: env::var("CANCELLATION_NOTICE_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cancellation_notice_hours),
            booking_buffer_minutes: env::var("BOOKING_BUFFER_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.booking_buffer_minutes),
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            meeting_link_base_url,
            policy,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080").
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
