use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    statsvc_observability::init();

    let config = statsvc_api::config::Config::from_env()?;
    tracing::info!(backend = config.backend.as_str(), "starting statsvc");

    let state = statsvc_api::app::state::build_state(&config).await?;
    let app = statsvc_api::app::build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
