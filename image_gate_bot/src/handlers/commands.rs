use serenity::all::{
    ChannelId, ChannelType, CommandInteraction, CommandOptionType, Context, CreateCommand,
    CreateCommandOption, CreateInteractionResponse, CreateInteractionResponseMessage,
    Mentionable, UserId,
};
use tokio::sync::Mutex;

use crate::types::MonitorState;

pub const SET_CHANNEL: &str = "setchannel";
pub const SET_LOG_CHANNEL: &str = "setlogchannel";
const CHANNEL_OPTION: &str = "channel";

pub const DENIED: &str = "❌ Owner-only command.";

/// Slash commands to register with Discord.
pub fn generate_bot_commands() -> Vec<CreateCommand> {
    let channel_option = |description: &str| {
        CreateCommandOption::new(CommandOptionType::Channel, CHANNEL_OPTION, description)
            .channel_types(vec![ChannelType::Text, ChannelType::News])
            .required(true)
    };

    vec![
        CreateCommand::new(SET_CHANNEL)
            .description("Set the channel where only images are allowed (owner only)")
            .add_option(channel_option("Channel to keep images-only")),
        CreateCommand::new(SET_LOG_CHANNEL)
            .description("Set the channel where deletions get logged (owner only)")
            .add_option(channel_option("Channel to log deletions to")),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    SetChannel(ChannelId),
    SetLogChannel(ChannelId),
}

impl ConfigCommand {
    /// `None` if it's not one of ours or the channel is missing.
    pub fn parse(name: &str, channel: Option<ChannelId>) -> Option<Self> {
        let channel = channel?;
        match name {
            SET_CHANNEL => Some(ConfigCommand::SetChannel(channel)),
            SET_LOG_CHANNEL => Some(ConfigCommand::SetLogChannel(channel)),
            _ => None,
        }
    }

    fn from_interaction(command: &CommandInteraction) -> Option<Self> {
        let channel = command
            .data
            .options
            .iter()
            .find(|x| x.name == CHANNEL_OPTION)
            .and_then(|x| x.value.as_channel_id());
        Self::parse(&command.data.name, channel)
    }
}

/// Owner commands are open to exactly one account. No owner means nobody.
pub fn is_owner(owner: Option<UserId>, caller: UserId) -> bool {
    owner == Some(caller)
}

/// Check the caller and apply the command. Returns the reply to show the caller.
pub async fn apply(
    state: &Mutex<MonitorState>,
    owner: Option<UserId>,
    caller: UserId,
    command: ConfigCommand,
) -> String {
    if !is_owner(owner, caller) {
        log::info!("Non-owner {caller} tried to use {command:?}");
        return DENIED.to_string();
    }

    let mut state = state.lock().await;
    match command {
        ConfigCommand::SetChannel(channel) => {
            state.set_monitored_channel(channel);
            log::info!("Now monitoring channel {channel}.");
            format!("✅ Now keeping {} images-only.", channel.mention())
        }
        ConfigCommand::SetLogChannel(channel) => {
            state.set_log_channel(channel);
            log::info!("Now logging deletions to channel {channel}.");
            format!("✅ Deletions will be logged to {}.", channel.mention())
        }
    }
}

/// Handle a slash command interaction, replying privately to whoever sent it.
pub async fn handle_command(
    ctx: &Context,
    command: &CommandInteraction,
    state: &Mutex<MonitorState>,
    owner: Option<UserId>,
) -> Result<(), serenity::Error> {
    let reply = match ConfigCommand::from_interaction(command) {
        Some(parsed) => apply(state, owner, command.user.id, parsed).await,
        None => {
            log::warn!("Got an unknown command: /{}", command.data.name);
            "Unknown command.".to_string()
        }
    };

    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(reply)
                    .ephemeral(true),
            ),
        )
        .await
}
