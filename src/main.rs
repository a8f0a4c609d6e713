mod championship;
mod grouping;
mod racecount;
mod results;
mod settings;
mod shared;
mod summary;

use axum::{
    routing::{get, post},
    Router,
};
use championship::repository::InMemoryConfigurationRepository;
// use championship::repository::PostgresConfigurationRepository; // For production
use championship::store::ConfigurationStore;
use racecount::repository::InMemoryRaceCountRepository;
// use racecount::repository::PostgresRaceCountRepository; // For production
use racecount::store::RaceCountStore;
use settings::StorageSettings;
use shared::AppState;
use std::sync::Arc;
use summary::InMemorySummaryAggregator;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "racegrid=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting race result grouping server");

    let settings = Arc::new(StorageSettings::from_env());
    info!(
        strategy = %settings.grouping_strategy,
        races_per_championship = settings.races_per_championship,
        "Storage settings loaded"
    );

    // Create shared application state with dependency injection
    // Easy to switch between implementations:
    let configuration_repository = Arc::new(InMemoryConfigurationRepository::new());
    let race_count_repository = Arc::new(InMemoryRaceCountRepository::new());

    // For production with PostgreSQL:
    // let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    // let pool = sqlx::PgPool::connect(&database_url).await.expect("Failed to connect to database");
    // let configuration_repository = Arc::new(PostgresConfigurationRepository::new(pool.clone()));
    // let race_count_repository = Arc::new(PostgresRaceCountRepository::new(pool));

    let configuration_store = Arc::new(ConfigurationStore::new(configuration_repository));
    let race_count_store = match RaceCountStore::load(race_count_repository).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "Failed to load race count state");
            std::process::exit(1);
        }
    };

    let strategy = match grouping::build_strategy(
        &settings,
        Arc::clone(&configuration_store),
        Arc::clone(&race_count_store),
    )
    .await
    {
        Ok(strategy) => strategy,
        Err(e) => {
            error!(error = %e, "Failed to build grouping strategy");
            std::process::exit(1);
        }
    };

    let summary = Arc::new(InMemorySummaryAggregator::new());

    let app_state = AppState::new(
        settings,
        configuration_store,
        race_count_store,
        strategy,
        summary,
    );

    // build our application with the championship and result routes
    let app = Router::new()
        .route("/", get(|| async { "Race result grouping server" }))
        .route("/api/results", post(results::upload_result))
        .route(
            "/api/championships/strategy",
            get(championship::get_strategy),
        )
        .route(
            "/api/championships/configurations",
            get(championship::list_configurations).post(championship::create_configuration),
        )
        .route(
            "/api/championships/configurations/:id",
            get(championship::get_configuration)
                .put(championship::update_configuration)
                .delete(championship::delete_configuration),
        )
        .route(
            "/api/championships/racecount",
            get(racecount::get_all_race_counts),
        )
        .route(
            "/api/championships/racecount/reset",
            post(racecount::reset_race_count),
        )
        .route(
            "/api/championships/racecount/:year",
            get(racecount::get_race_count_state),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // run our app with hyper, listening globally on port 3000
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
