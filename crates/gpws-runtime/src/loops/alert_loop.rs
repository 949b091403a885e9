//! Terrain alert loop.
//!
//! Polls the vehicle at a fixed period, runs the terrain scan and drives the
//! visual and audio alert outputs. The sequencer owns all alert state; the
//! background task owns the sequencer while it runs and hands it back on stop.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use gpws_core::{scan, AlertThresholds, Scan, ScanFault, TerrainOracle, ThreatDecision, VehicleStateSource};

use crate::outputs::{AlertOutputState, AudioAlert, Clock, SystemClock, VisualAlert};

/// Alert sequencer: Quiet unless the latest decision was Warn.
pub struct AlertSequencer {
    vehicle: Arc<dyn VehicleStateSource>,
    terrain: Arc<dyn TerrainOracle>,
    visual: Box<dyn VisualAlert>,
    audio: Box<dyn AudioAlert>,
    clock: Box<dyn Clock>,
    rules: AlertThresholds,
    state: AlertOutputState,
    last_decision: Option<ThreatDecision>,
}

impl AlertSequencer {
    pub fn new(
        vehicle: Arc<dyn VehicleStateSource>,
        terrain: Arc<dyn TerrainOracle>,
        visual: Box<dyn VisualAlert>,
        audio: Box<dyn AudioAlert>,
        rules: AlertThresholds,
    ) -> Self {
        Self {
            vehicle,
            terrain,
            visual,
            audio,
            clock: Box::new(SystemClock),
            rules,
            state: AlertOutputState::default(),
            last_decision: None,
        }
    }

    /// Replace the wall clock used for the audio cooldown.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.rules
    }

    pub fn output_state(&self) -> &AlertOutputState {
        &self.state
    }

    pub fn last_decision(&self) -> Option<ThreatDecision> {
        self.last_decision
    }

    /// Run one evaluation cycle and update the outputs.
    pub fn tick(&mut self) -> ThreatDecision {
        let vehicle = self.vehicle.vehicle_state();
        let result = scan(vehicle.as_ref(), self.terrain.as_ref(), &self.rules);
        log_fault(&result);

        let decision = result.decision();
        self.log_transition(&result);

        if decision.is_warn() {
            self.alert();
        } else {
            self.go_quiet();
        }

        self.last_decision = Some(decision);
        decision
    }

    /// Force the outputs to Quiet: visual off, blink phase reset. The audio
    /// timestamp is left alone.
    pub fn go_quiet(&mut self) {
        self.state.reset();
        self.visual.set_visual_alert(false);
    }

    fn alert(&mut self) {
        let now = self.clock.now();
        if self.state.audio_due(now, self.rules.audio_cooldown_ms) {
            // Stamped even on failure so a rejecting device is not hammered.
            self.state.last_audio_played_at = Some(now);
            if let Err(e) = self.audio.request_audio_alert() {
                tracing::info!("Audio alert not played: {}", e);
            }
        }

        self.state.visual_on = !self.state.visual_on;
        self.visual.set_visual_alert(self.state.visual_on);
    }

    fn log_transition(&self, result: &Scan) {
        let decision = result.decision();
        if self.last_decision == Some(decision) {
            return;
        }
        match decision {
            ThreatDecision::Warn => tracing::warn!(
                rule = ?result.rule,
                clearance_m = result.clearance_m.map(|c| c.round()),
                "PULL UP: terrain ahead within {}s",
                self.rules.horizon_s
            ),
            _ if self.last_decision == Some(ThreatDecision::Warn) => {
                tracing::info!(rule = ?result.rule, "Terrain alert cleared ({:?})", decision)
            }
            _ => tracing::debug!(rule = ?result.rule, "Alert state {:?}", decision),
        }
    }

    /// Move the sequencer onto a background task ticking every
    /// `tick_period_ms`.
    pub fn start(self) -> SequencerHandle {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(run_alert_loop(self, shutdown_rx));
        SequencerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

fn log_fault(result: &Scan) {
    match result.fault {
        Some(ScanFault::TerrainUnavailable(point)) => tracing::warn!(
            lat = point.lat,
            lon = point.lon,
            "Future terrain data unavailable. Skipping terrain check."
        ),
        Some(ScanFault::ProjectionFailed) => {
            tracing::debug!("Future position calculation failed. Skipping terrain check.")
        }
        Some(ScanFault::MissingInput) => tracing::trace!("No complete vehicle state this tick"),
        None => {}
    }
}

/// Tick the sequencer until shutdown is signalled (or every handle is dropped),
/// then force the outputs quiet and hand the sequencer back.
pub async fn run_alert_loop(
    mut sequencer: AlertSequencer,
    mut shutdown: broadcast::Receiver<()>,
) -> AlertSequencer {
    // Every run starts with fresh alert state.
    sequencer.state = AlertOutputState::default();
    sequencer.last_decision = None;

    let mut ticker = interval(sequencer.rules.tick_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        "Terrain alert loop started ({} ms period)",
        sequencer.rules.tick_period().as_millis()
    );

    loop {
        tokio::select! {
            biased;
            _ = shutdown.recv() => {
                tracing::info!("Terrain alert loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                // A collaborator panicking must not take the loop down with it.
                if catch_unwind(AssertUnwindSafe(|| sequencer.tick())).is_err() {
                    tracing::error!("Terrain alert tick panicked; continuing with next tick");
                    sequencer.go_quiet();
                }
            }
        }
    }

    sequencer.go_quiet();
    sequencer
}

/// Handle to a running alert loop.
pub struct SequencerHandle {
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<AlertSequencer>,
}

impl SequencerHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel the loop and wait for it to go quiet. Returns the sequencer so it
    /// can be restarted, or `None` if the task died.
    pub async fn stop(self) -> Option<AlertSequencer> {
        let _ = self.shutdown.send(());
        match self.task.await {
            Ok(sequencer) => Some(sequencer),
            Err(e) => {
                tracing::error!("Terrain alert loop ended abnormally: {}", e);
                None
            }
        }
    }
}

/// Owner of at most one running alert loop.
#[derive(Default)]
pub struct AlertRuntime {
    handle: Option<SequencerHandle>,
}

impl AlertRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `sequencer`, stopping any loop already running first so there is
    /// never more than one timer.
    pub async fn start(&mut self, sequencer: AlertSequencer) {
        if let Some(previous) = self.handle.take() {
            tracing::info!("Terrain alert loop already running; restarting");
            previous.stop().await;
        }
        self.handle = Some(sequencer.start());
    }

    /// Stop the running loop, if any.
    pub async fn stop(&mut self) -> Option<AlertSequencer> {
        let handle = self.handle.take()?;
        handle.stop().await
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(SequencerHandle::is_running)
    }
}
