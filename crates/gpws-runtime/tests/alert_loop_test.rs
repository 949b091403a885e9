//! Alert loop lifecycle tests.
//!
//! Run on a paused tokio clock so tick counts are deterministic.

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use gpws_core::{AlertThresholds, GeoPosition, ProjectedPoint, VehicleState, VehicleStateSource, Velocity};
use gpws_runtime::{AlertRuntime, AlertSequencer, AudioAlert, AudioError, Clock, VisualAlert};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};

struct CountingHost {
    polls: Arc<AtomicUsize>,
    state: VehicleState,
}

impl VehicleStateSource for CountingHost {
    fn vehicle_state(&self) -> Option<VehicleState> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        Some(self.state)
    }
}

struct Visual(Arc<Mutex<Vec<bool>>>);

impl VisualAlert for Visual {
    fn set_visual_alert(&mut self, on: bool) {
        self.0.lock().unwrap().push(on);
    }
}

struct Audio(Arc<AtomicUsize>);

impl AudioAlert for Audio {
    fn request_audio_alert(&mut self) -> Result<(), AudioError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Wall clock that follows tokio's (pausable) clock.
struct TokioClock {
    origin: Instant,
    origin_utc: DateTime<Utc>,
}

impl TokioClock {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            origin_utc: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().duration_since(self.origin);
        self.origin_utc + ChronoDuration::milliseconds(elapsed.as_millis() as i64)
    }
}

/// Level flight at 1400 m MSL, 400 m above the local ground.
fn cruising() -> VehicleState {
    VehicleState {
        position: GeoPosition {
            lat: 46.5,
            lon: 8.0,
            altitude_msl_m: 1400.0,
        },
        velocity: Velocity {
            east_mps: 0.0,
            north_mps: 70.0,
            vertical_mps: 0.0,
        },
        ground_speed_mps: 70.0,
        ground_elevation_m: 1000.0,
        gear_extended: false,
        on_ground: false,
    }
}

struct Rig {
    polls: Arc<AtomicUsize>,
    visual: Arc<Mutex<Vec<bool>>>,
    audio: Arc<AtomicUsize>,
}

impl Rig {
    fn new() -> Self {
        Self {
            polls: Arc::new(AtomicUsize::new(0)),
            visual: Arc::new(Mutex::new(Vec::new())),
            audio: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sequencer flying over terrain at `terrain_m` everywhere ahead.
    fn sequencer(&self, terrain_m: f64) -> AlertSequencer {
        let terrain = move |_: ProjectedPoint| -> Option<f64> { Some(terrain_m) };
        AlertSequencer::new(
            Arc::new(CountingHost {
                polls: self.polls.clone(),
                state: cruising(),
            }),
            Arc::new(terrain),
            Box::new(Visual(self.visual.clone())),
            Box::new(Audio(self.audio.clone())),
            AlertThresholds::default(),
        )
        .with_clock(Box::new(TokioClock::new()))
    }

    fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[tokio::test(start_paused = true)]
async fn double_start_leaves_one_timer() {
    let rig = Rig::new();
    let mut runtime = AlertRuntime::new();

    runtime.start(rig.sequencer(0.0)).await;
    runtime.start(rig.sequencer(0.0)).await;
    assert!(runtime.is_running());

    sleep(Duration::from_millis(10)).await;
    let before = rig.polls();
    sleep(Duration::from_millis(1000)).await;
    let ticks = rig.polls() - before;

    // One 250 ms timer gives 4 ticks per second; a duplicate would double it.
    assert!((4..=5).contains(&ticks), "got {ticks} ticks in one second");

    runtime.stop().await;
    assert!(!runtime.is_running());
}

#[tokio::test(start_paused = true)]
async fn stop_forces_quiet() {
    let rig = Rig::new();
    let mut runtime = AlertRuntime::new();

    // Ridge at 1320 m: 80 m clearance, warning
    runtime.start(rig.sequencer(1320.0)).await;
    sleep(Duration::from_millis(600)).await;
    assert!(rig.visual.lock().unwrap().contains(&true));

    let sequencer = runtime.stop().await.expect("sequencer returned on stop");
    assert!(!sequencer.output_state().visual_on);
    assert_eq!(rig.visual.lock().unwrap().last(), Some(&false));

    // No ticks after stop
    let polls = rig.polls();
    sleep(Duration::from_millis(1000)).await;
    assert_eq!(rig.polls(), polls);
}

#[tokio::test(start_paused = true)]
async fn stopped_sequencer_can_be_restarted() {
    let rig = Rig::new();
    let mut runtime = AlertRuntime::new();

    runtime.start(rig.sequencer(0.0)).await;
    sleep(Duration::from_millis(300)).await;
    let sequencer = runtime.stop().await.expect("sequencer returned on stop");

    let polls = rig.polls();
    runtime.start(sequencer).await;
    sleep(Duration::from_millis(300)).await;
    assert!(rig.polls() > polls);
    runtime.stop().await;
}

#[tokio::test(start_paused = true)]
async fn restart_during_warning_plays_again() {
    let rig = Rig::new();
    let mut runtime = AlertRuntime::new();

    runtime.start(rig.sequencer(1320.0)).await;
    sleep(Duration::from_millis(100)).await;
    let sequencer = runtime.stop().await.expect("sequencer returned on stop");
    assert_eq!(rig.audio.load(Ordering::SeqCst), 1);
    assert!(sequencer.output_state().last_audio_played_at.is_some());

    // Well inside the cooldown of the first run
    runtime.start(sequencer).await;
    sleep(Duration::from_millis(100)).await;
    let sequencer = runtime.stop().await.expect("sequencer returned on stop");

    assert_eq!(rig.audio.load(Ordering::SeqCst), 2);
    assert_eq!(sequencer.last_decision(), Some(gpws_core::ThreatDecision::Warn));
}

#[tokio::test(start_paused = true)]
async fn audio_is_debounced_while_warning_persists() {
    let rig = Rig::new();
    let mut runtime = AlertRuntime::new();

    runtime.start(rig.sequencer(1320.0)).await;
    sleep(Duration::from_millis(9_900)).await;
    runtime.stop().await;

    // Plays at 0 ms, 4750 ms and 9500 ms (first ticks strictly past each cooldown)
    assert_eq!(rig.audio.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn panicking_oracle_does_not_kill_the_loop() {
    let rig = Rig::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let oracle_calls = calls.clone();
    let terrain = move |_: ProjectedPoint| -> Option<f64> {
        if oracle_calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("terrain tile cache corrupted");
        }
        Some(0.0)
    };

    let sequencer = AlertSequencer::new(
        Arc::new(CountingHost {
            polls: rig.polls.clone(),
            state: cruising(),
        }),
        Arc::new(terrain),
        Box::new(Visual(rig.visual.clone())),
        Box::new(Audio(rig.audio.clone())),
        AlertThresholds::default(),
    );

    let mut runtime = AlertRuntime::new();
    runtime.start(sequencer).await;
    sleep(Duration::from_millis(1000)).await;

    assert!(calls.load(Ordering::SeqCst) >= 4);
    assert!(runtime.is_running());
    assert!(runtime.stop().await.is_some());
}
