use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use tutorsync_api::collaborators::{LogNotifier, StaticMeetingLinks};
use tutorsync_api::config::ApiConfig;
use tutorsync_api::ApiState;
use tutorsync_db::postgres::PgStore;
use tutorsync_db::{create_pool, schema::initialize_database};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Wire the Postgres store and default collaborators into the API
    let store = Arc::new(PgStore::new(db_pool));
    let state = Arc::new(ApiState {
        availability: store.clone(),
        ledger: store,
        notifier: Arc::new(LogNotifier),
        meeting_links: Arc::new(StaticMeetingLinks::new(
            config.meeting_link_base_url.clone(),
        )),
        policy: config.policy,
    });

    // Start API server
    tutorsync_api::start_server(config, state).await?;

    Ok(())
}
