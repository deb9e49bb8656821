use anyhow::Result;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::core::config::Config;
use crate::core::lifecycle::LifecycleManager;
use crate::core::llm::openai::OpenAiProvider;
use crate::core::pipeline;
use crate::core::publisher::TypefullyPublisher;
use crate::core::scraper::FirecrawlScraper;
use crate::core::store::StateStore;
use crate::core::terminal;
use crate::interfaces::web::{ApiServer, ApiServerConfig};
use crate::logging::BroadcastMakeWriter;

pub async fn run(args: &[String]) -> Result<()> {
    let mut config = Config::from_env()?;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--api-port" => {
                if i + 1 < args.len() {
                    config.api_port = args[i + 1].parse().unwrap_or(config.api_port);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--api-host" => {
                if i + 1 < args.len() {
                    config.api_host = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    let (log_tx, _) = tokio::sync::broadcast::channel::<String>(500);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(BroadcastMakeWriter {
            sender: log_tx.clone(),
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    terminal::print_banner();

    let store = StateStore::open(config.data_dir.join("plume.db")).await?;

    let scraper = Arc::new(FirecrawlScraper::new(config.firecrawl.api_key.clone()));
    let model = Arc::new(OpenAiProvider::new(
        config.openai.api_key.clone(),
        config.openai.model.clone(),
    ));
    let publisher = Arc::new(TypefullyPublisher::new(config.typefully.api_key.clone()));

    let orchestrator = pipeline::build(scraper, model, publisher, store.clone());
    let bus = orchestrator.bus();
    orchestrator.spawn();

    let mut lifecycle = LifecycleManager::new();
    lifecycle.attach(Arc::new(tokio::sync::Mutex::new(ApiServer::new(
        ApiServerConfig {
            bus,
            store,
            log_tx,
            api_host: config.api_host.clone(),
            api_port: config.api_port,
        },
    ))));
    lifecycle.start().await?;

    info!(
        "Content pipeline ready at http://{}:{}",
        config.api_host, config.api_port
    );

    tokio::signal::ctrl_c().await?;
    lifecycle.shutdown().await?;
    Ok(())
}
