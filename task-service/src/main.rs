use anyhow::Context;
use task_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config);

    let state = AppState::builder()
        .config(config.clone())
        .build()
        .await
        .context("failed to initialise task storage")?;

    Server::new(config)
        .serve(create_router(state))
        .await
        .context("server error")?;

    Ok(())
}
