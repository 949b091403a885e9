//! Log-backed alert outputs for the simulator.

use gpws_runtime::{AudioAlert, AudioError, VisualAlert};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counters shared between the outputs and the caller.
#[derive(Debug, Clone, Default)]
pub struct SignalCounts {
    visual_on: Arc<AtomicUsize>,
    audio_requests: Arc<AtomicUsize>,
}

impl SignalCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks on which the "PULL UP" box was shown.
    pub fn visual_on(&self) -> usize {
        self.visual_on.load(Ordering::SeqCst)
    }

    pub fn audio_requests(&self) -> usize {
        self.audio_requests.load(Ordering::SeqCst)
    }
}

/// Logs the visual alert whenever it changes.
pub struct LogVisualAlert {
    counts: SignalCounts,
    showing: bool,
}

impl LogVisualAlert {
    pub fn new(counts: SignalCounts) -> Self {
        Self {
            counts,
            showing: false,
        }
    }
}

impl VisualAlert for LogVisualAlert {
    fn set_visual_alert(&mut self, on: bool) {
        if on {
            self.counts.visual_on.fetch_add(1, Ordering::SeqCst);
        }
        if on != self.showing {
            tracing::debug!(target: "gpws_sim::display", "PULL UP box {}", if on { "shown" } else { "hidden" });
            self.showing = on;
        }
    }
}

/// Logs each audio request; with `muted` set it behaves like a device that
/// refuses playback.
pub struct LogAudioAlert {
    counts: SignalCounts,
    muted: bool,
}

impl LogAudioAlert {
    pub fn new(counts: SignalCounts, muted: bool) -> Self {
        Self { counts, muted }
    }
}

impl AudioAlert for LogAudioAlert {
    fn request_audio_alert(&mut self) -> Result<(), AudioError> {
        self.counts.audio_requests.fetch_add(1, Ordering::SeqCst);
        if self.muted {
            return Err(AudioError::Rejected("audio muted by --mute-audio".to_string()));
        }
        tracing::warn!(target: "gpws_sim::audio", "\"Terrain, terrain, pull up!\"");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_visual_frames_and_audio_requests() {
        let counts = SignalCounts::new();
        let mut visual = LogVisualAlert::new(counts.clone());
        let mut audio = LogAudioAlert::new(counts.clone(), false);

        visual.set_visual_alert(true);
        visual.set_visual_alert(false);
        visual.set_visual_alert(true);
        audio.request_audio_alert().unwrap();

        assert_eq!(counts.visual_on(), 2);
        assert_eq!(counts.audio_requests(), 1);
    }

    #[test]
    fn muted_audio_rejects_but_counts() {
        let counts = SignalCounts::new();
        let mut audio = LogAudioAlert::new(counts.clone(), true);
        assert!(matches!(audio.request_audio_alert(), Err(AudioError::Rejected(_))));
        assert_eq!(counts.audio_requests(), 1);
    }
}
