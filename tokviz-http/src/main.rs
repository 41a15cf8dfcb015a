use std::sync::Arc;

use tokviz_core::Visualizer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod routes;

use config::ServerConfig;
use routes::AppState;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("tokviz_http=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Worker thread count is process configuration, so the runtime is built by hand.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()?;
    runtime.block_on(serve(config))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let pipeline = config.load_pipeline()?;
    info!(
        vocabulary = pipeline.output_vocabulary().len(),
        dim = pipeline.dim(),
        embedding = ?config.embedding,
        "pipeline configured"
    );
    let visualizer = Visualizer::new(pipeline, config.embedding_source());

    let state = AppState {
        visualizer: Arc::new(visualizer),
    };
    let app = routes::router(state, config.cors_origins.clone());

    let (host, port) = config.bind_target();
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| anyhow::anyhow!("bind {host}:{port}: {e}"))?;
    let addr = listener.local_addr()?;
    info!(
        "{} v{} listening on {addr}",
        config::SERVICE_NAME,
        config::API_VERSION
    );
    axum::serve(listener, app).await?;

    Ok(())
}
