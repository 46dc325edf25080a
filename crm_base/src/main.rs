use anyhow::Result;
use clap::Parser;
use crm_base::config::Config;
use folio::{middleware::TracingLayer, serve, transport::StdioTransport, ServiceExt};
use tower::Layer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Logging. stdout carries the protocol, so logs go to a file.
    let file_appender = tracing_appender::rolling::daily(config.log_dir(), config.log_file_name());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), ?config, "Starting crm-base");

    // A registration conflict aborts startup before anything is served
    let registry = crm_base::registry(config.discovery())?;
    let service = crm_base::service(registry);

    serve(
        TracingLayer::new().layer(service).into_request_service(),
        StdioTransport::new(),
    )
    .await?;

    Ok(())
}
