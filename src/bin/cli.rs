use clap::Parser;
use orders_service::cli;
use orders_service::env::setup_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    let cli = cli::CliEnv::parse();
    setup_tracing(&cli.env.log_level);

    cli::run_command(cli).await
}
