//! Output collaborators driven by the alert sequencer, and the state it keeps
//! about them.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Presentation surface for the "PULL UP" indication.
pub trait VisualAlert: Send {
    fn set_visual_alert(&mut self, on: bool);
}

/// Audio device for the "terrain, pull up" tone.
///
/// Playback is fire-and-forget: the sequencer logs a rejection and moves on.
pub trait AudioAlert: Send {
    fn request_audio_alert(&mut self) -> Result<(), AudioError>;
}

#[derive(Debug, Error)]
pub enum AudioError {
    /// The device refused to start playback (e.g. no user interaction yet)
    #[error("audio playback rejected: {0}")]
    Rejected(String),
    #[error("audio device unavailable")]
    Unavailable,
}

/// Wall clock used to stamp audio emissions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        if let Ok(mut now) = self.now.lock() {
            *now += ChronoDuration::milliseconds(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
            .lock()
            .map(|now| *now)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

/// Alert output state, owned by exactly one sequencer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertOutputState {
    /// Current blink phase; only ever true while warning
    pub visual_on: bool,
    pub last_audio_played_at: Option<DateTime<Utc>>,
}

impl AlertOutputState {
    /// Whether the audio cooldown has strictly elapsed at `now`.
    pub fn audio_due(&self, now: DateTime<Utc>, cooldown_ms: u64) -> bool {
        match self.last_audio_played_at {
            None => true,
            Some(last) => {
                let cooldown_ms = i64::try_from(cooldown_ms).unwrap_or(i64::MAX);
                now.signed_duration_since(last).num_milliseconds() > cooldown_ms
            }
        }
    }

    /// Leave the alerting state. The audio timestamp is kept so a quick
    /// re-entry into Warn cannot retrigger the tone early.
    pub fn reset(&mut self) {
        self.visual_on = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn audio_due_when_never_played() {
        let state = AlertOutputState::default();
        assert!(state.audio_due(t0(), 4500));
    }

    #[test]
    fn audio_cooldown_is_strict() {
        let state = AlertOutputState {
            visual_on: true,
            last_audio_played_at: Some(t0()),
        };
        assert!(!state.audio_due(t0() + ChronoDuration::milliseconds(4500), 4500));
        assert!(state.audio_due(t0() + ChronoDuration::milliseconds(4501), 4500));
    }

    #[test]
    fn clock_going_backwards_is_not_due() {
        let state = AlertOutputState {
            visual_on: false,
            last_audio_played_at: Some(t0()),
        };
        assert!(!state.audio_due(t0() - ChronoDuration::seconds(10), 4500));
    }

    #[test]
    fn reset_keeps_audio_timestamp() {
        let mut state = AlertOutputState {
            visual_on: true,
            last_audio_played_at: Some(t0()),
        };
        state.reset();
        assert!(!state.visual_on);
        assert_eq!(state.last_audio_played_at, Some(t0()));
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(t0());
        let other = clock.clone();
        clock.advance_ms(250);
        assert_eq!(other.now(), t0() + ChronoDuration::milliseconds(250));
    }
}
