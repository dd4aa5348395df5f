use std::sync::Arc;

use llm_relay_service::{
    config::Config,
    llm_providers::{openrouter::OpenRouterClient, ChatClient},
    prompts::PromptResolver,
    routes,
    service::ChatService,
    storage::{supabase::SupabaseStore, RecordStore},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let loaded_config = Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&loaded_config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "initialising OpenRouter client against {}",
        loaded_config.openrouter_base_url
    );
    let chat: Arc<dyn ChatClient> = Arc::new(OpenRouterClient::new(
        loaded_config.openrouter_api_key,
        loaded_config.openrouter_base_url,
        loaded_config.site_url,
    ));

    info!(
        "initialising Supabase record store at {}",
        loaded_config.supabase_url
    );
    let store: Arc<dyn RecordStore> = Arc::new(SupabaseStore::new(
        loaded_config.supabase_url,
        loaded_config.supabase_key,
    ));

    let resolver = PromptResolver::new(&loaded_config.prompts_path);
    let service = Arc::new(ChatService::new(resolver, chat, store));

    let app = routes::router(service);

    let listener = tokio::net::TcpListener::bind(&loaded_config.bind_addr).await?;
    info!("server listening on {}", loaded_config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");

    tracing::info!("Ctrl+C received, shutting down gracefully");
}

#[tokio::main]
async fn main() {
    if let Err(e) = init().await {
        error!("Application error: {:?}", e);
    }
}
