use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use serenity::{
    all::{Command, Context, EventHandler, GatewayIntents, Interaction, Ready, UserId},
    async_trait,
};

use crate::{
    actions::SerenityPlatform,
    sweeper::{sweep_spinloop, SharedState, Sweeper},
};

pub mod commands;

/// Handler for Discord gateway events.
pub struct Handler {
    state: SharedState,
    owner: Option<UserId>,
    sweep_period: Duration,
    /// "ready" fires again on every reconnect; the sweep loop should only start once.
    sweep_started: AtomicBool,
}

impl Handler {
    pub fn new(state: SharedState, owner: Option<UserId>, sweep_period: Duration) -> Self {
        Self {
            state,
            owner,
            sweep_period,
            sweep_started: AtomicBool::new(false),
        }
    }

    /// Gateway intents the bot needs. Message content is needed for the deletion logs.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("Logged in as {}", ready.user.name);

        let bot_commands = commands::generate_bot_commands();
        if let Err(e) = Command::set_global_commands(&ctx.http, bot_commands).await {
            log::error!("Failed to register slash commands: {e}");
        }

        if self.sweep_started.swap(true, Ordering::SeqCst) {
            log::debug!("Reconnected, sweep loop is already running.");
            return;
        }

        let platform = SerenityPlatform::new(ctx.http.clone(), ctx.cache.clone());
        let sweeper = Arc::new(Sweeper::new(platform, Arc::clone(&self.state)));

        log::info!("Sweeping every {} seconds.", self.sweep_period.as_secs());
        tokio::spawn(sweep_spinloop(sweeper, self.sweep_period));
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        if let Err(e) = commands::handle_command(&ctx, &command, &self.state, self.owner).await {
            log::warn!("Failed to respond to /{}: {e}", command.data.name);
        }
    }
}
