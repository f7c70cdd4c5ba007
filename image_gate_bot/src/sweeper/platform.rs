use std::future::Future;

use serenity::all::{ChannelId, MessageId};

use crate::types::{DeletionLogEntry, SweptMessage};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// Deleted, lost access, network fell over... Try again next time.
    #[error("channel is unavailable: {0}")]
    ChannelUnavailable(String),
    #[error("channel {0} is not a text channel")]
    NotATextChannel(ChannelId),
    #[error("missing permissions: {0}")]
    Forbidden(String),
    #[error("request failed: {0}")]
    Transport(String),
}

/// The bits of a chat platform the sweeper needs.
pub trait ChatPlatform: Send + Sync {
    /// Make sure the channel exists and is something we can sweep.
    fn resolve_channel(
        &self,
        channel: ChannelId,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    /// Up to `limit` messages created after `after`, or the newest `limit` messages if `after`
    /// is `None`. Order is whatever the platform feels like.
    fn fetch_messages_after(
        &self,
        channel: ChannelId,
        after: Option<MessageId>,
        limit: u8,
    ) -> impl Future<Output = Result<Vec<SweptMessage>, PlatformError>> + Send;

    fn delete_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;

    fn post_deletion_log(
        &self,
        log_channel: ChannelId,
        entry: &DeletionLogEntry,
    ) -> impl Future<Output = Result<(), PlatformError>> + Send;
}
