use std::future::Future;

use serenity::all::{CacheHttp, ChannelId, ChannelType, GuildChannel, Message, User};

pub trait MessageStuff {
    /// Declared content types of all attachments on this message, in order.
    /// `None` for attachments Discord didn't declare a type for.
    fn attachment_content_types(&self) -> impl Iterator<Item = Option<&str>> + '_;
}

impl MessageStuff for Message {
    fn attachment_content_types(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.attachments.iter().map(|x| x.content_type.as_deref())
    }
}

pub trait UserStuff {
    /// Tries to print the user in the prettiest way possible, with the display name if they have
    /// one or the username otherwise. Optionally allows including user ID.
    fn name_prettyprint(&self, with_id: bool) -> String;
}

impl UserStuff for User {
    fn name_prettyprint(&self, with_id: bool) -> String {
        let name = self.global_name.as_deref().unwrap_or(&self.name);
        let id = with_id.then(|| self.id.get());
        name_with_id(name, id)
    }
}

fn name_with_id(name: &str, id: Option<u64>) -> String {
    match id {
        Some(id) => format!("{name} (userid {id})"),
        None => name.to_string(),
    }
}

/// Whether messages in channels of this kind are the plain chat kind we moderate.
#[must_use]
pub fn is_text_like(kind: ChannelType) -> bool {
    matches!(kind, ChannelType::Text | ChannelType::News)
}

pub trait ChannelIdStuff {
    /// Resolve this channel from the cache, falling back to asking Discord.
    /// Returns `Ok(None)` if it exists but is not a guild text channel.
    fn to_text_channel<C: CacheHttp>(
        self,
        cache_http: C,
    ) -> impl Future<Output = Result<Option<GuildChannel>, serenity::Error>> + Send;
}

impl ChannelIdStuff for ChannelId {
    async fn to_text_channel<C: CacheHttp>(
        self,
        cache_http: C,
    ) -> Result<Option<GuildChannel>, serenity::Error> {
        let channel = self.to_channel(cache_http).await?;
        Ok(channel.guild().filter(|x| is_text_like(x.kind)))
    }
}
