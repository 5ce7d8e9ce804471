use clap::{Parser, Subcommand};
use orders_widget::{HtmlContainer, HttpOrderSource, LookupOutcome, OrderLookupWidget, TextInput};
use sqlx::SqlitePool;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::env::Env;
use crate::queue;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read order document {path}: {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Order document {path} is not valid JSON: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Look up an order through a running order service and print the
    /// rendered result
    Lookup {
        #[arg(long = "order-id")]
        order_id: String,
        /// Overrides ORDER_SERVICE_URL for this lookup
        #[arg(long = "base-url")]
        base_url: Option<Url>,
    },
    /// Push an order JSON document onto the ingestion queue
    Enqueue {
        #[arg(long)]
        file: PathBuf,
    },
    /// Print how many queued orders are waiting to be processed
    QueueStatus,
}

#[derive(Debug, Parser)]
#[command(name = "orders-cli")]
#[command(about = "A CLI tool for looking up and ingesting orders")]
#[command(version)]
pub struct CliEnv {
    #[clap(flatten)]
    pub env: Env,
    #[clap(long, env, default_value = "http://127.0.0.1:3000")]
    pub order_service_url: Url,
    #[command(subcommand)]
    pub command: Commands,
}

pub async fn run_command(cli: CliEnv) -> anyhow::Result<()> {
    run_command_with_writers(cli, &mut std::io::stdout()).await
}

async fn run_command_with_writers<W: Write>(cli: CliEnv, stdout: &mut W) -> anyhow::Result<()> {
    match cli.command {
        Commands::Lookup { order_id, base_url } => {
            let base_url = base_url.unwrap_or(cli.order_service_url);
            info!("Looking up order {order_id} at {base_url}");
            lookup_with_writers(&base_url, &order_id, stdout).await?;
        }
        Commands::Enqueue { file } => {
            let pool = open_pool(&cli.env).await?;
            enqueue_with_writers(&pool, &file, stdout).await?;
        }
        Commands::QueueStatus => {
            let pool = open_pool(&cli.env).await?;
            queue_status_with_writers(&pool, stdout).await?;
        }
    }

    info!("CLI operation completed successfully");
    Ok(())
}

async fn open_pool(env: &Env) -> anyhow::Result<SqlitePool> {
    let pool = env.get_sqlite_pool().await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}

async fn lookup_with_writers<W: Write>(
    base_url: &Url,
    order_id: &str,
    stdout: &mut W,
) -> anyhow::Result<LookupOutcome> {
    let result = HtmlContainer::default();
    let widget = OrderLookupWidget::new(
        Arc::new(HttpOrderSource::new(base_url.as_str())),
        TextInput::new(order_id),
        result.clone(),
    );

    let outcome = widget.lookup().await;
    writeln!(stdout, "{}", result.inner_html())?;
    Ok(outcome)
}

async fn enqueue_with_writers<W: Write>(
    pool: &SqlitePool,
    file: &Path,
    stdout: &mut W,
) -> anyhow::Result<i64> {
    let payload = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| CliError::ReadDocument {
            path: file.to_path_buf(),
            source,
        })?;

    serde_json::from_str::<serde_json::Value>(&payload).map_err(|source| {
        CliError::InvalidDocument {
            path: file.to_path_buf(),
            source,
        }
    })?;

    let id = queue::enqueue(pool, &payload).await?;
    writeln!(stdout, "Queued {} as entry {id}", file.display())?;
    Ok(id)
}

async fn queue_status_with_writers<W: Write>(
    pool: &SqlitePool,
    stdout: &mut W,
) -> anyhow::Result<i64> {
    let count = queue::count_unprocessed(pool).await?;
    writeln!(stdout, "Unprocessed queued orders: {count}")?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TEST_ORDER_UID, sample_order, setup_test_db};
    use httpmock::MockServer;
    use serde_json::json;

    fn temp_document(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("order-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_lookup_command() {
        let cli = CliEnv::try_parse_from([
            "orders-cli",
            "--db",
            ":memory:",
            "lookup",
            "--order-id",
            "abc",
            "--base-url",
            "http://orders.local:8081",
        ])
        .unwrap();

        assert_eq!(cli.env.database_url, ":memory:");
        assert_eq!(cli.order_service_url.as_str(), "http://127.0.0.1:3000/");
        match cli.command {
            Commands::Lookup { order_id, base_url } => {
                assert_eq!(order_id, "abc");
                assert_eq!(base_url.unwrap().as_str(), "http://orders.local:8081/");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_invalid_url() {
        let result = CliEnv::try_parse_from([
            "orders-cli",
            "--order-service-url",
            "not a url",
            "queue-status",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_enqueue_requires_file() {
        assert!(CliEnv::try_parse_from(["orders-cli", "enqueue"]).is_err());
    }

    #[tokio::test]
    async fn test_lookup_prints_rendered_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET)
                .path(format!("/orders/{TEST_ORDER_UID}"));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::to_value(sample_order()).unwrap());
        });
        let base_url = Url::parse(&server.base_url()).unwrap();

        let mut stdout = Vec::new();
        let outcome = lookup_with_writers(&base_url, TEST_ORDER_UID, &mut stdout)
            .await
            .unwrap();

        mock.assert();
        assert!(matches!(outcome, LookupOutcome::Found(_)));
        let output = String::from_utf8(stdout).unwrap();
        assert!(output.contains(TEST_ORDER_UID));
        assert!(output.contains("WBILMTESTTRACK"));
    }

    #[tokio::test]
    async fn test_lookup_prints_server_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET).path("/orders/missing");
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({"code": 404, "msg": "order not found"}));
        });
        let base_url = Url::parse(&server.base_url()).unwrap();

        let mut stdout = Vec::new();
        lookup_with_writers(&base_url, "missing", &mut stdout)
            .await
            .unwrap();

        mock.assert();
        let output = String::from_utf8(stdout).unwrap();
        assert!(output.contains("Code: 404"));
        assert!(output.contains("Message: order not found"));
    }

    #[tokio::test]
    async fn test_lookup_empty_id_skips_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::GET);
            then.status(200);
        });
        let base_url = Url::parse(&server.base_url()).unwrap();

        let mut stdout = Vec::new();
        let outcome = lookup_with_writers(&base_url, "   ", &mut stdout)
            .await
            .unwrap();

        mock.assert_hits(0);
        assert!(matches!(outcome, LookupOutcome::NotEntered));
        assert_eq!(String::from_utf8(stdout).unwrap(), "ID not entered\n");
    }

    #[tokio::test]
    async fn test_enqueue_then_status() {
        let pool = setup_test_db().await;
        let path = temp_document(&serde_json::to_string(&sample_order()).unwrap());

        let mut stdout = Vec::new();
        let id = enqueue_with_writers(&pool, &path, &mut stdout).await.unwrap();
        queue_status_with_writers(&pool, &mut stdout).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let output = String::from_utf8(stdout).unwrap();
        assert!(output.contains(&format!("as entry {id}")));
        assert!(output.contains("Unprocessed queued orders: 1"));
    }

    #[tokio::test]
    async fn test_enqueue_rejects_invalid_json() {
        let pool = setup_test_db().await;
        let path = temp_document("{not json");

        let err = enqueue_with_writers(&pool, &path, &mut std::io::sink())
            .await
            .unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidDocument { .. })
        ));
        assert_eq!(queue::count_unprocessed(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_enqueue_missing_file() {
        let pool = setup_test_db().await;
        let path = std::env::temp_dir().join("does-not-exist-order.json");

        let err = enqueue_with_writers(&pool, &path, &mut std::io::sink())
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ReadDocument { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_command_queue_status() {
        let cli = CliEnv::try_parse_from(["orders-cli", "--db", ":memory:", "queue-status"]).unwrap();

        let mut stdout = Vec::new();
        run_command_with_writers(cli, &mut stdout).await.unwrap();

        assert_eq!(
            String::from_utf8(stdout).unwrap(),
            "Unprocessed queued orders: 0\n"
        );
    }
}
