//! hemolens — blood test report analyzer service.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hemolens::api::server;
use hemolens::api::types::ApiContext;
use hemolens::config::{self, ServiceConfig};
use hemolens::document::PdfReportExtractor;
use hemolens::llm::ollama::OllamaClient;
use hemolens::pipeline::runner::AnalysisPipeline;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let config = Arc::new(ServiceConfig::from_env());
    tracing::info!(
        version = config::APP_VERSION,
        addr = %config.bind_addr,
        model = %config.model,
        "hemolens starting"
    );

    let client = OllamaClient::new(
        &config.ollama_base_url,
        &config.model,
        config.llm_timeout_secs,
    )?;

    // Non-fatal: the service can start before Ollama does, requests will
    // surface the connection failure per-call.
    match client.is_model_available(&config.model).await {
        Ok(true) => tracing::info!(model = %config.model, "reasoning model confirmed"),
        Ok(false) => tracing::warn!(
            model = %config.model,
            "reasoning model not pulled; analysis requests will fail until it is"
        ),
        Err(e) => tracing::warn!(error = %e, "cannot reach Ollama yet"),
    }

    let pipeline = Arc::new(AnalysisPipeline::new(
        Arc::new(client),
        Arc::new(PdfReportExtractor),
    ));
    let ctx = ApiContext::new(config.clone(), pipeline);

    let server = server::start(ctx, config.bind_addr).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");
    server.shutdown_and_wait().await;

    Ok(())
}
