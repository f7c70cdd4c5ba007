use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, MessageId};

use crate::{
    classifier::is_image_bearing,
    misc::{truncate_chars, EMBED_DESCRIPTION_LIMIT},
};

/// Which channels the bot is working with. Starts out from the environment and is changed by
/// owner commands afterwards. Lives in memory only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorConfig {
    pub monitored_channel: Option<ChannelId>,
    pub log_channel: Option<ChannelId>,
}

/// Last message in the monitored channel that a sweep is done with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    last_seen: Option<MessageId>,
}

impl Cursor {
    pub fn get(&self) -> Option<MessageId> {
        self.last_seen
    }

    pub fn advance(&mut self, id: MessageId) {
        self.last_seen = Some(id);
    }

    pub fn reset(&mut self) {
        self.last_seen = None;
    }
}

/// Everything the sweeper and the owner commands share.
#[derive(Debug, Default)]
pub struct MonitorState {
    pub config: MonitorConfig,
    cursor: Cursor,
    /// Bumped every time the monitored channel is set.
    generation: u64,
}

impl MonitorState {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            cursor: Cursor::default(),
            generation: 0,
        }
    }

    pub fn cursor(&self) -> Option<MessageId> {
        self.cursor.get()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Point the bot at another channel. The cursor always starts over, even if it's the same
    /// channel as before.
    pub fn set_monitored_channel(&mut self, channel: ChannelId) {
        self.config.monitored_channel = Some(channel);
        self.cursor.reset();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn set_log_channel(&mut self, channel: ChannelId) {
        self.config.log_channel = Some(channel);
    }

    /// Move the cursor to `id`, but only if the monitored channel hasn't been set since
    /// `generation` was read. Returns `false` if it has.
    pub fn advance_cursor_for(&mut self, generation: u64, id: MessageId) -> bool {
        if self.generation != generation {
            return false;
        }
        self.cursor.advance(id);
        true
    }
}

/// A single attachment, as far as we care about it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentMeta {
    pub content_type: Option<String>,
}

/// Read-only view of a message from the monitored channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweptMessage {
    pub id: MessageId,
    pub author_is_bot: bool,
    /// Pretty-printed author, for logs.
    pub author: String,
    pub attachments: Vec<AttachmentMeta>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl SweptMessage {
    pub fn is_image_bearing(&self) -> bool {
        is_image_bearing(self.attachments.iter().map(|x| x.content_type.as_deref()))
    }
}

/// What gets posted to the log channel about a message we're about to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionLogEntry {
    pub actor: String,
    pub channel: ChannelId,
    pub message: MessageId,
    pub original_content: String,
    pub created_at: DateTime<Utc>,
}

impl DeletionLogEntry {
    pub fn new(message: &SweptMessage, channel: ChannelId) -> Self {
        Self {
            actor: message.author.clone(),
            channel,
            message: message.id,
            original_content: message.content.clone(),
            created_at: message.created_at,
        }
    }

    /// Original content, made fit for an embed description.
    pub fn content_for_embed(&self) -> String {
        if self.original_content.trim().is_empty() {
            return "*(no text content)*".to_string();
        }
        truncate_chars(&self.original_content, EMBED_DESCRIPTION_LIMIT).into_owned()
    }
}
