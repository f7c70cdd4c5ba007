use std::sync::Arc;

use serenity::Client;
use tokio::sync::Mutex;

use crate::{
    config::{Config, ConfigError},
    handlers::Handler,
    types::MonitorState,
};

#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    #[error("bad configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to start the liveness endpoint: {0}")]
    Liveness(#[source] std::io::Error),
    #[error("discord client failed: {0}")]
    Discord(#[from] serenity::Error),
}

/// Load the config, start the liveness endpoint and run the bot until it's bonked.
pub async fn entry() -> Result<(), EntryError> {
    log::info!("ASYNC WOOOO");

    let config = Config::from_env()?;

    match config.owner {
        Some(owner) => log::info!("Owner commands are open to user {owner}."),
        None => log::warn!("BOT_OWNER_ID is not set, owner commands will always be denied."),
    }
    if config.monitored_channel.is_none() {
        log::info!("No channel to monitor yet. Set one with /setchannel.");
    }

    bot_commons::keepalive::spawn(config.port)
        .await
        .map_err(EntryError::Liveness)?;

    let state = Arc::new(Mutex::new(MonitorState::new(config.initial_monitor_config())));
    let handler = Handler::new(state, config.owner, config.sweep_interval);

    log::info!("Creating the client...");

    let mut client = Client::builder(&config.token, Handler::intents())
        .event_handler(handler)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Got Ctrl-C, shutting down.");
            shard_manager.shutdown_all().await;
        }
    });

    log::info!("Connecting to the gateway!");

    client.start().await?;

    log::info!("it appears we have been bonked.");
    Ok(())
}
