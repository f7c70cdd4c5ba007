use std::sync::Arc;

use bot_commons::useful_methods::{ChannelIdStuff, MessageStuff, UserStuff};
use chrono::{DateTime, Utc};
use serenity::all::{
    Cache, ChannelId, Colour, CreateEmbed, CreateMessage, GetMessages, Http, Mentionable,
    Message, MessageId, Timestamp,
};

use crate::{
    sweeper::{ChatPlatform, PlatformError},
    types::{AttachmentMeta, DeletionLogEntry, SweptMessage},
};

/// [`ChatPlatform`] backed by an actual Discord connection.
pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }
}

/// HTTP status Discord answered with, if it got that far.
fn status_of(error: &serenity::Error) -> Option<u16> {
    match error {
        serenity::Error::Http(e) => e.status_code().map(|x| x.as_u16()),
        _ => None,
    }
}

fn error_for_status(status: Option<u16>, reason: String) -> PlatformError {
    match status {
        Some(403) => PlatformError::Forbidden(reason),
        _ => PlatformError::Transport(reason),
    }
}

fn request_failed(error: serenity::Error) -> PlatformError {
    error_for_status(status_of(&error), error.to_string())
}

/// How a failed delete should be taken.
fn delete_failed(status: Option<u16>, reason: String) -> Result<(), PlatformError> {
    match status {
        // Someone else probably has already deleted it. That's fine.
        Some(404) => Ok(()),
        _ => Err(error_for_status(status, reason)),
    }
}

impl From<&Message> for SweptMessage {
    fn from(message: &Message) -> Self {
        SweptMessage {
            id: message.id,
            author_is_bot: message.author.bot,
            author: message.author.name_prettyprint(true),
            attachments: message
                .attachment_content_types()
                .map(|x| AttachmentMeta {
                    content_type: x.map(str::to_owned),
                })
                .collect(),
            content: message.content.clone(),
            created_at: DateTime::from_timestamp(message.timestamp.unix_timestamp(), 0)
                .unwrap_or_else(Utc::now),
        }
    }
}

fn deletion_log_embed(entry: &DeletionLogEntry) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title("Deleted a message without an image")
        .description(entry.content_for_embed())
        .field("Author", &entry.actor, true)
        .field("Channel", entry.channel.mention().to_string(), true)
        .colour(Colour::RED);

    match Timestamp::from_unix_timestamp(entry.created_at.timestamp()) {
        Ok(timestamp) => embed.timestamp(timestamp),
        Err(_) => embed,
    }
}

impl ChatPlatform for SerenityPlatform {
    async fn resolve_channel(&self, channel: ChannelId) -> Result<(), PlatformError> {
        match channel
            .to_text_channel((&self.cache, self.http.as_ref()))
            .await
        {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(PlatformError::NotATextChannel(channel)),
            Err(e) => Err(PlatformError::ChannelUnavailable(e.to_string())),
        }
    }

    async fn fetch_messages_after(
        &self,
        channel: ChannelId,
        after: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<SweptMessage>, PlatformError> {
        let mut request = GetMessages::new().limit(limit);
        if let Some(after) = after {
            request = request.after(after);
        }

        let messages = channel
            .messages(self.http.as_ref(), request)
            .await
            .map_err(request_failed)?;

        Ok(messages.iter().map(SweptMessage::from).collect())
    }

    async fn delete_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Result<(), PlatformError> {
        match channel.delete_message(&self.http, message).await {
            Ok(()) => Ok(()),
            Err(e) => delete_failed(status_of(&e), e.to_string()),
        }
    }

    async fn post_deletion_log(
        &self,
        log_channel: ChannelId,
        entry: &DeletionLogEntry,
    ) -> Result<(), PlatformError> {
        log_channel
            .send_message(
                self.http.as_ref(),
                CreateMessage::new().embed(deletion_log_embed(entry)),
            )
            .await
            .map(|_| ())
            .map_err(request_failed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    fn discord_message(bot: bool, attachments: serde_json::Value) -> Message {
        serde_json::from_value(json!({
            "id": "900",
            "channel_id": "1000",
            "author": {
                "id": "55",
                "username": "catposter",
                "global_name": null,
                "discriminator": "0000",
                "avatar": null,
                "bot": bot,
            },
            "content": "look at this",
            "timestamp": "2023-11-14T22:13:20+00:00",
            "edited_timestamp": null,
            "tts": false,
            "mention_everyone": false,
            "mentions": [],
            "mention_roles": [],
            "mention_channels": [],
            "attachments": attachments,
            "embeds": [],
            "reactions": [],
            "pinned": false,
            "type": 0,
            "components": [],
            "sticker_items": [],
        }))
        .unwrap()
    }

    fn attachment(id: &str, content_type: Option<&str>) -> serde_json::Value {
        let mut attachment = json!({
            "id": id,
            "filename": "file",
            "size": 1234,
            "url": "https://cdn.discordapp.com/attachments/1000/900/file",
            "proxy_url": "https://media.discordapp.net/attachments/1000/900/file",
        });
        if let Some(content_type) = content_type {
            attachment["content_type"] = json!(content_type);
        }
        attachment
    }

    #[test]
    fn statuses_map_to_errors() {
        assert_eq!(
            error_for_status(Some(403), "Missing Permissions".into()),
            PlatformError::Forbidden("Missing Permissions".into())
        );
        assert_eq!(
            error_for_status(Some(500), "Internal Server Error".into()),
            PlatformError::Transport("Internal Server Error".into())
        );
        assert_eq!(
            error_for_status(None, "connection reset".into()),
            PlatformError::Transport("connection reset".into())
        );
        // Only deletes get a pass on 404.
        assert_eq!(
            error_for_status(Some(404), "Unknown Channel".into()),
            PlatformError::Transport("Unknown Channel".into())
        );
    }

    #[test]
    fn deleting_something_already_gone_is_fine() {
        assert_eq!(delete_failed(Some(404), "Unknown Message".into()), Ok(()));
        assert_eq!(
            delete_failed(Some(403), "Missing Permissions".into()),
            Err(PlatformError::Forbidden("Missing Permissions".into()))
        );
        assert_eq!(
            delete_failed(Some(502), "Bad Gateway".into()),
            Err(PlatformError::Transport("Bad Gateway".into()))
        );
        assert_eq!(
            delete_failed(None, "timed out".into()),
            Err(PlatformError::Transport("timed out".into()))
        );
    }

    #[test]
    fn discord_messages_convert() {
        let message = discord_message(
            true,
            json!([attachment("1", None), attachment("2", Some("image/png"))]),
        );

        let swept = SweptMessage::from(&message);

        assert_eq!(swept.id, MessageId::new(900));
        assert!(swept.author_is_bot);
        assert_eq!(swept.author, "catposter (userid 55)");
        assert_eq!(swept.content, "look at this");
        assert_eq!(swept.created_at.timestamp(), 1_700_000_000);
        assert_eq!(
            swept.attachments,
            vec![
                AttachmentMeta { content_type: None },
                AttachmentMeta {
                    content_type: Some("image/png".to_string())
                },
            ]
        );
        assert!(swept.is_image_bearing());
    }

    #[test]
    fn undeclared_attachment_type_is_not_an_image() {
        let message = discord_message(false, json!([attachment("1", None)]));

        let swept = SweptMessage::from(&message);

        assert!(!swept.author_is_bot);
        assert_eq!(swept.attachments, vec![AttachmentMeta { content_type: None }]);
        assert!(!swept.is_image_bearing());
    }

    #[test]
    fn log_embed_has_the_details() {
        let message = discord_message(false, json!([]));
        let entry = DeletionLogEntry::new(&SweptMessage::from(&message), ChannelId::new(1000));

        let embed = serde_json::to_value(deletion_log_embed(&entry)).unwrap();

        assert_eq!(embed["description"], "look at this");
        assert_eq!(embed["fields"][0]["value"], "catposter (userid 55)");
        assert_eq!(embed["fields"][1]["value"], "<#1000>");
    }
}
