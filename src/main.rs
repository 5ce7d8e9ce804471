use clap::Parser;
use orders_service::env::{Env, setup_tracing};
use orders_service::launch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    let env = Env::try_parse()?;
    setup_tracing(&env.log_level);

    launch(env).await
}
