use std::{fs, time::Duration};

use serenity::all::{ChannelId, UserId};

use crate::{sweeper::DEFAULT_SWEEP_INTERVAL, types::MonitorConfig};

pub const DEFAULT_PORT: u16 = 10000;

/// Older deployments used the other names for the monitored channel.
const MONITORED_CHANNEL_VARS: &[&str] = &[
    "MONITORED_CHANNEL_ID",
    "TARGET_CHANNEL_ID",
    "SOURCE_CHANNEL_ID",
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no bot token: set DISCORD_TOKEN or put it into the key file")]
    MissingToken,
    #[error("{var} is not a valid number: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// `None` means nobody may use the owner commands.
    pub owner: Option<UserId>,
    pub monitored_channel: Option<ChannelId>,
    pub log_channel: Option<ChannelId>,
    pub sweep_interval: Duration,
    pub port: u16,
}

impl Config {
    /// Read the config from the process environment, with the token falling back to the `key`
    /// file (`key_debug` in debug builds) in the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok(), read_key_file)
    }

    /// Same as [`Config::from_env`], but with the environment and the key file swapped for
    /// arbitrary functions.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        key_file: impl FnOnce() -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = nonblank(lookup("DISCORD_TOKEN"))
            .or_else(|| nonblank(key_file()))
            .ok_or(ConfigError::MissingToken)?;

        let owner = parse_id(&lookup, "BOT_OWNER_ID")?.map(UserId::new);

        let mut monitored_channel = None;
        for &var in MONITORED_CHANNEL_VARS {
            if let Some(id) = parse_id(&lookup, var)? {
                monitored_channel = Some(ChannelId::new(id));
                break;
            }
        }

        let log_channel = parse_id(&lookup, "LOG_CHANNEL_ID")?.map(ChannelId::new);

        let sweep_interval = match parse_number::<u64>(&lookup, "SWEEP_INTERVAL_SECS")? {
            Some(0) => Err(ConfigError::InvalidNumber {
                var: "SWEEP_INTERVAL_SECS",
                value: "0".to_string(),
            })?,
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_SWEEP_INTERVAL,
        };

        let port = parse_number::<u16>(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);

        Ok(Config {
            token,
            owner,
            monitored_channel,
            log_channel,
            sweep_interval,
            port,
        })
    }

    /// What the bot watches right after startup.
    pub fn initial_monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            monitored_channel: self.monitored_channel,
            log_channel: self.log_channel,
        }
    }
}

fn read_key_file() -> Option<String> {
    fs::read_to_string(match cfg!(debug_assertions) {
        true => "key_debug",
        false => "key",
    })
    .ok()
}

fn nonblank(value: Option<String>) -> Option<String> {
    value
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = nonblank(lookup(var)) else {
        return Ok(None);
    };

    value
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

/// Discord IDs are never zero, so zero means "unset".
fn parse_id(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    Ok(parse_number::<u64>(lookup, var)?.filter(|&x| x != 0))
}
