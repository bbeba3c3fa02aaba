use employee_directory::{
    config::AppConfig, create_router, database, AppState, EmployeeService,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "employee_directory=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!(environment = %config.environment, "Starting employee directory service");

    let app_state = match &config.database_url {
        Some(url) => {
            let pool = database::connect(url).await?;
            database::run_migrations(&pool).await?;
            AppState::postgres(pool, &config)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory storage; data is lost on restart");
            AppState::in_memory(&config)
        }
    };

    if config.seed_sample_data {
        let seeded = EmployeeService::new(Arc::clone(&app_state.employee_repository))
            .seed_sample_employees()
            .await?;
        info!(seeded, "Sample data check complete");
    }

    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
