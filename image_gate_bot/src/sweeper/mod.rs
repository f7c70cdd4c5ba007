use std::{sync::Arc, time::Duration};

use serenity::all::MessageId;
use tokio::{
    sync::Mutex,
    time::{interval, MissedTickBehavior},
};

use crate::types::{DeletionLogEntry, MonitorState};

mod platform;
pub use platform::*;

/// How many messages a single sweep looks at, at most.
pub const SWEEP_BATCH_LIMIT: u8 = 50;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(45);

/// Config and cursor, shared between the sweeper and the owner commands.
pub type SharedState = Arc<Mutex<MonitorState>>;

/// Tally of what a sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub examined: usize,
    pub kept: usize,
    pub deleted: usize,
    pub failed_deletes: usize,
    pub skipped_bots: usize,
}

impl SweepReport {
    pub fn did_anything(&self) -> bool {
        self.deleted > 0 || self.failed_deletes > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// No channel is being monitored.
    Idle,
    /// Another sweep was still running.
    Skipped,
    /// Couldn't get at the channel or its history. Nothing was touched.
    Aborted(PlatformError),
    Completed(SweepReport),
}

/// Deletes everything without an image from the monitored channel, a batch at a time.
pub struct Sweeper<P> {
    platform: P,
    state: SharedState,
    /// Held for the whole duration of a sweep.
    in_flight: Mutex<()>,
}

impl<P: ChatPlatform> Sweeper<P> {
    pub fn new(platform: P, state: SharedState) -> Self {
        Self {
            platform,
            state,
            in_flight: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Run a sweep, unless one is already running, in which case this does nothing.
    pub async fn tick(&self) -> SweepOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            log::debug!("Previous sweep is still running, skipping this tick.");
            return SweepOutcome::Skipped;
        };

        self.sweep().await
    }

    async fn sweep(&self) -> SweepOutcome {
        let (channel, after, log_channel, generation) = {
            let state = self.state.lock().await;
            let Some(channel) = state.config.monitored_channel else {
                return SweepOutcome::Idle;
            };
            (
                channel,
                state.cursor(),
                state.config.log_channel,
                state.generation(),
            )
        };

        if let Err(e) = self.platform.resolve_channel(channel).await {
            log::warn!("Can't get at channel {channel}: {e}");
            return SweepOutcome::Aborted(e);
        }

        let mut messages = match self
            .platform
            .fetch_messages_after(channel, after, SWEEP_BATCH_LIMIT)
            .await
        {
            Ok(messages) => messages,
            Err(e) => {
                log::warn!("Error while checking channel {channel}: {e}");
                return SweepOutcome::Aborted(e);
            }
        };

        // Oldest first, so that the cursor only ever moves forward.
        messages.sort_by_key(|x| x.id);

        let mut report = SweepReport::default();

        for message in &messages {
            report.examined += 1;

            // Bots are left alone, and so is the cursor.
            if message.author_is_bot {
                report.skipped_bots += 1;
                continue;
            }

            if message.is_image_bearing() {
                log::debug!("Keeping message {} from {}", message.id, message.author);
                report.kept += 1;
            } else {
                if let Some(log_channel) = log_channel {
                    let entry = DeletionLogEntry::new(message, channel);
                    // No biggie if this fails.
                    if let Err(e) = self.platform.post_deletion_log(log_channel, &entry).await {
                        log::warn!(
                            "Failed to log deletion of {} to {log_channel}: {e}",
                            entry.message
                        );
                    }
                }

                match self.platform.delete_message(channel, message.id).await {
                    Ok(()) => {
                        log::info!("Deleted message from {}", message.author);
                        report.deleted += 1;
                    }
                    Err(e @ PlatformError::Forbidden(_)) => {
                        log::warn!("Missing permissions to delete messages in {channel}: {e}");
                        report.failed_deletes += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to delete message {}: {e}", message.id);
                        report.failed_deletes += 1;
                    }
                }
            }

            if !self.advance_cursor(generation, message.id).await {
                log::info!("Monitored channel changed mid-sweep, dropping the rest of the batch.");
                break;
            }
        }

        SweepOutcome::Completed(report)
    }

    async fn advance_cursor(&self, generation: u64, id: MessageId) -> bool {
        self.state.lock().await.advance_cursor_for(generation, id)
    }
}

/// Sweep every `period` forever. Ticks that come due while a sweep is still running are
/// dropped instead of piling up.
pub async fn sweep_spinloop<P>(sweeper: Arc<Sweeper<P>>, period: Duration)
where
    P: ChatPlatform + 'static,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        // Own task, so that a panic in there doesn't take the loop down with it.
        let sweeper = Arc::clone(&sweeper);
        match tokio::spawn(async move { sweeper.tick().await }).await {
            Ok(SweepOutcome::Completed(report)) if report.did_anything() => {
                log::info!(
                    "Sweep done: {} examined, {} kept, {} deleted, {} failed to delete, {} from bots.",
                    report.examined,
                    report.kept,
                    report.deleted,
                    report.failed_deletes,
                    report.skipped_bots
                );
            }
            Ok(outcome) => log::debug!("Sweep outcome: {outcome:?}"),
            Err(e) => log::error!("Sweep task died: {e}"),
        }
    }
}
