//! Chat relay — entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config (env overrides applied)
//!   3. Init logger at configured level
//!   4. Load persona template, build provider and memory
//!   5. Serve until SIGINT

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use chat_relay::{
    agent::ConversationalAgent,
    config,
    error::AppError,
    llm::providers,
    logger,
    memory::ConversationMemory,
    persona::PersonaTemplate,
    relay,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;

    logger::parse_level(&config.log_level)?;
    logger::init(&config.log_level)?;

    info!(
        bot_name = %config.bot_name,
        bind = %config.bind,
        provider = %config.llm.provider,
        model = %config.llm.gemini.model,
        has_api_key = config.llm_api_key.is_some(),
        "config loaded"
    );

    let persona = PersonaTemplate::from_file(&config.persona.template)?;
    let provider = providers::build(&config.llm, config.llm_api_key.clone())?;
    let memory = ConversationMemory::with_cap(config.memory.transcript_cap);
    let agent = Arc::new(ConversationalAgent::new(persona, provider, memory));

    let shutdown = CancellationToken::new();
    {
        let token = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                token.cancel();
            }
        });
    }

    relay::run(&config.bind, agent, shutdown).await
}
