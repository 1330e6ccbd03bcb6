use std::net::SocketAddr;
use std::sync::Arc;

use infrastructure::{DynamoDbClient, DynamoTaskRepository, DynamoUserRepository};
use shared::{Config, TokenService};
use task_api::{app_with_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    shared::telemetry::init_tracing().map_err(|e| anyhow::anyhow!(e))?;

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let db = DynamoDbClient::new(&config).await;

    let state = AppState {
        users: Arc::new(DynamoUserRepository::new(db.clone())),
        tasks: Arc::new(DynamoTaskRepository::new(db)),
        tokens: TokenService::new(&config.jwt_secret),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = %config.environment, "server starting");

    axum::serve(listener, app_with_state(state)).await?;
    Ok(())
}
