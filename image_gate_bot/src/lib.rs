//! Source code for Image Gate Bot: keeps a Discord channel images-only by
//! periodically deleting every message that doesn't carry an image.

/// Startup configuration from the environment.
mod config;

/// Various types used throughout.
mod types;

/// Deciding whether a message carries an image.
mod classifier;

/// Miscellaneous functions.
mod misc;

/// The periodic history sweep and the platform it talks to.
mod sweeper;

/// Functions that perform stuff via the bot.
mod actions;

/// Functions that handle events from Discord.
mod handlers;

/// Entry function that starts the bot.
mod entry;
pub use entry::*;
