use dotenvy::dotenv;
use examhall::logging::init_tracing;
use examhall::metrics::{init_metrics, metrics_app};
use examhall::router::init_router;
use examhall::state::AppState;
use examhall_config::{CorsConfig, JwtConfig, ServerConfig};
use examhall_db::{PgAccountStore, init_db_pool, run_migrations};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let metrics_handle = init_metrics();

    let pool = init_db_pool().await;
    if let Err(e) = run_migrations(&pool).await {
        error!(error = %e, "Failed to apply migrations");
        std::process::exit(1);
    }

    let state = AppState::new(
        PgAccountStore::new(pool),
        JwtConfig::from_env(),
        CorsConfig::from_env(),
    );

    let mut app = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let server_config = ServerConfig::from_env();
    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .expect("Failed to bind address");

    info!(address = %address, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", address);
    info!("Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app).await.expect("Server error");
}
