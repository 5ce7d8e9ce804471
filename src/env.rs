use clap::Parser;
use sqlx::SqlitePool;
use tracing::Level;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

impl From<&LogLevel> for Level {
    fn from(log_level: &LogLevel) -> Self {
        (*log_level).into()
    }
}

#[derive(Parser, Debug, Clone)]
pub struct Env {
    #[clap(long = "db", env, default_value = "sqlite:orders.db?mode=rwc")]
    pub database_url: String,
    #[clap(long, env, default_value = "info")]
    pub log_level: LogLevel,
    /// Address the HTTP server binds to
    #[clap(long, env, default_value = "0.0.0.0")]
    pub server_address: String,
    #[clap(long, env, default_value = "3000")]
    pub server_port: u16,
}

impl Env {
    pub async fn get_sqlite_pool(&self) -> Result<SqlitePool, sqlx::Error> {
        SqlitePool::connect(&self.database_url).await
    }
}

fn default_filter(level: Level) -> String {
    format!("orders_service={level},orders_widget={level},orders_server={level},orders_cli={level}")
}

/// Console logging. `RUST_LOG` overrides the level given here.
pub fn setup_tracing(log_level: &LogLevel) {
    let level: Level = log_level.into();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(level).into()),
        )
        .compact()
        .init();
}
