use std::collections::HashMap;

use channels::ChannelSender;
use chrono::{FixedOffset, NaiveTime, Utc};

use crate::config::PushSettings;
use crate::domain::PushMessage;
use crate::errors::{FeedgrepError, FeedgrepResult};

/// Time-of-day window during which delivery is allowed, evaluated in one
/// fixed reference zone. Outside the window every push is suppressed.
#[derive(Debug, Clone)]
pub struct DeliveryWindow {
    enabled: bool,
    start: NaiveTime,
    end: NaiveTime,
    offset: FixedOffset,
}

impl DeliveryWindow {
    pub fn new(enabled: bool, start: &str, end: &str, utc_offset: i32) -> FeedgrepResult<Self> {
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .map_err(|_| FeedgrepError::Config(format!("invalid push window time: {}", s)))
        };
        let offset = FixedOffset::east_opt(utc_offset * 3600)
            .ok_or_else(|| FeedgrepError::Config(format!("invalid utc_offset: {}", utc_offset)))?;

        Ok(Self {
            enabled,
            start: parse(start)?,
            end: parse(end)?,
            offset,
        })
    }

    pub fn from_settings(settings: &PushSettings) -> FeedgrepResult<Self> {
        Self::new(
            settings.time_restriction_enabled,
            &settings.time_start,
            &settings.time_end,
            settings.utc_offset,
        )
    }

    /// Whether `now` (a wall-clock time in the reference zone) falls inside
    /// the window. `start > end` means the window wraps midnight:
    /// `now >= start OR now <= end`. A disabled window allows everything.
    pub fn allows(&self, now: NaiveTime) -> bool {
        if !self.enabled {
            return true;
        }

        if self.start <= self.end {
            self.start <= now && now < self.end
        } else {
            now >= self.start || now <= self.end
        }
    }

    pub fn allows_now(&self) -> bool {
        self.allows(Utc::now().with_timezone(&self.offset).time())
    }
}

/// Fans one message out to named channels, gated by the delivery window.
/// Senders are built once from configuration; per-channel failure is counted
/// and logged, never escalated.
pub struct PushService {
    senders: HashMap<String, Box<dyn ChannelSender>>,
    window: DeliveryWindow,
    enabled: bool,
    dry_run: bool,
}

impl PushService {
    pub fn new(
        senders: HashMap<String, Box<dyn ChannelSender>>,
        window: DeliveryWindow,
        enabled: bool,
    ) -> Self {
        Self {
            senders,
            window,
            enabled,
            dry_run: false,
        }
    }

    /// Build all channel adapters from configuration. An invalid channel
    /// definition is a startup error, not a runtime one.
    pub fn from_settings(settings: &PushSettings) -> FeedgrepResult<Self> {
        let mut senders: HashMap<String, Box<dyn ChannelSender>> = HashMap::new();
        for (name, config) in &settings.webhooks {
            let sender = channels::build(config)
                .map_err(|e| FeedgrepError::Config(format!("channel '{}': {}", name, e)))?;
            senders.insert(name.clone(), sender);
        }

        Ok(Self::new(
            senders,
            DeliveryWindow::from_settings(settings)?,
            settings.enabled,
        ))
    }

    /// Render pushes without delivering them.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Deliver `message` to each named channel, returning how many sends
    /// succeeded. Returns 0 without contacting any channel when push is
    /// disabled or the delivery window is closed.
    pub fn dispatch(&self, channel_names: &[String], message: &PushMessage) -> usize {
        if channel_names.is_empty() {
            return 0;
        }

        if !self.enabled && !self.dry_run {
            tracing::debug!(title = %message.title, "push disabled, skipping");
            return 0;
        }

        if !self.window.allows_now() {
            tracing::info!(title = %message.title, "outside delivery window, push suppressed");
            return 0;
        }

        let mut delivered = 0;
        for name in channel_names {
            if self.dry_run {
                println!("[DRY RUN] {} <- {}\n{}", name, message.title, message.content);
                delivered += 1;
                continue;
            }

            let Some(sender) = self.senders.get(name) else {
                tracing::warn!(channel = %name, "push channel not configured, skipping");
                continue;
            };

            match sender.send(&message.title, &message.content) {
                Ok(()) => {
                    tracing::info!(channel = %name, kind = sender.kind(), title = %message.title, "push delivered");
                    delivered += 1;
                }
                Err(e) => {
                    tracing::warn!(channel = %name, kind = sender.kind(), error = %e, "push delivery failed");
                }
            }
        }

        delivered
    }
}
