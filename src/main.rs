use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::audit::AuditedStore;
use payroll_engine::config::ConfigLoader;
use payroll_engine::models::{ActorId, Employee, Role};
use payroll_engine::store::MemoryStore;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_dir = std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| "./config".to_string());
    let config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading configuration from {config_dir}"))?;
    let bind_address = config.server().bind_address.clone();

    let store = Arc::new(MemoryStore::new());
    // The first administrator is created by the system actor.
    let admin = AuditedStore::new(&*store, ActorId::SYSTEM)
        .create(Employee::new("Administrator", Role::Admin))
        .context("seeding administrator")?;
    info!(admin_id = admin.id, company = %config.company().name, "Store initialized");

    let state = AppState::new(config, store);
    let shutdown = state.shutdown_token();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {bind_address}"))?;
    info!(address = %bind_address, "Payroll server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
            shutdown.cancel();
        })
        .await
        .context("serving HTTP")?;
    Ok(())
}
