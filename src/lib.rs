use rocket::Config;
use std::sync::Arc;
use tracing::{error, info};

pub mod api;
pub mod cache;
pub mod cli;
pub mod env;
pub mod error;
pub mod queue;
pub mod repository;
pub mod service;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

pub use crate::env::{Env, LogLevel};
pub use crate::service::{OrderService, OrderServiceError};

pub async fn launch(env: Env) -> anyhow::Result<()> {
    let pool = env.get_sqlite_pool().await?;

    // Run database migrations to ensure all tables exist
    sqlx::migrate!().run(&pool).await?;

    let service = Arc::new(OrderService::new(pool.clone()));
    service.recover().await;

    let config = Config::figment()
        .merge(("port", env.server_port))
        .merge(("address", env.server_address.clone()));

    let rocket = rocket::custom(config)
        .mount("/", api::routes())
        .manage(Arc::clone(&service));

    let server_task = tokio::spawn(rocket.launch());

    let processor_task = tokio::spawn({
        let service = Arc::clone(&service);
        async move { queue::run_processor(pool, &service).await }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, shutting down gracefully...");
        }

        result = server_task => {
            match result {
                Ok(Ok(_)) => info!("Server completed successfully"),
                Ok(Err(e)) => error!("Server failed: {e}"),
                Err(e) => error!("Server task panicked: {e}"),
            }
        }

        result = processor_task => {
            if let Err(e) = result {
                error!("Queue processor task panicked: {e}");
            }
        }
    }

    info!("Shutdown complete");
    Ok(())
}
