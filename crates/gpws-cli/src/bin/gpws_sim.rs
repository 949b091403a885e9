//! Scenario simulator for the terrain-avoidance alerting core.
//!
//! Flies one scripted vehicle over synthetic terrain and runs the alert loop
//! against it until the duration elapses or Ctrl-C.
//!
//! Usage:
//!   cargo run -p gpws-cli --bin gpws-sim -- --scenario cfit --time-scale 4

use anyhow::{Context, Result};
use clap::Parser;
use gpws_cli::sim::{create_scenario, LogAudioAlert, LogVisualAlert, SignalCounts, SimulatedVehicle};
use gpws_cli::ScenarioKind;
use gpws_runtime::{logging, AlertRuntime, AlertSequencer, Config};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default scenario center (Bernese Oberland)
const DEFAULT_LAT: f64 = 46.55;
const DEFAULT_LON: f64 = 8.05;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the GPWS alert loop against a simulated flight")]
struct Args {
    /// Flight scenario to run
    #[arg(short, long, value_enum, default_value_t = ScenarioKind::Cfit)]
    scenario: ScenarioKind,

    /// Wall-clock run time in seconds
    #[arg(long, default_value_t = 30.0)]
    duration_s: f64,

    /// Profile seconds per wall-clock second
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// JSON thresholds file, used instead of GPWS_THRESHOLDS_FILE; single
    /// GPWS_* threshold variables still apply on top
    #[arg(long)]
    thresholds: Option<PathBuf>,

    /// Make the audio device reject every request
    #[arg(long, default_value_t = false)]
    mute_audio: bool,

    /// Scenario center latitude
    #[arg(long, default_value_t = DEFAULT_LAT)]
    lat: f64,

    /// Scenario center longitude
    #[arg(long, default_value_t = DEFAULT_LON)]
    lon: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env_with_thresholds_file(args.thresholds.as_deref())?;
    logging::init_tracing(&config)?;

    if !(args.duration_s.is_finite() && args.duration_s > 0.0) {
        anyhow::bail!("--duration-s must be positive, got {}", args.duration_s);
    }

    let scenario = create_scenario(args.scenario, args.lat, args.lon)
        .with_context(|| format!("cannot build terrain for {} at ({}, {})", args.scenario, args.lat, args.lon))?;

    tracing::info!(
        scenario = %scenario.kind,
        expected = ?scenario.expected,
        expected_at_s = scenario.expected_at_s,
        "{}",
        scenario.description
    );

    let counts = SignalCounts::new();
    let sequencer = AlertSequencer::new(
        Arc::new(SimulatedVehicle::new(scenario.profile.clone(), args.time_scale)),
        scenario.terrain.clone(),
        Box::new(LogVisualAlert::new(counts.clone())),
        Box::new(LogAudioAlert::new(counts.clone(), args.mute_audio)),
        config.thresholds.clone(),
    );

    let mut runtime = AlertRuntime::new();
    runtime.start(sequencer).await;

    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs_f64(args.duration_s)) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }

    let last = runtime.stop().await.and_then(|sequencer| sequencer.last_decision());

    println!("Scenario:        {}", scenario.kind);
    println!("Final decision:  {}", last.map_or("none".to_string(), |d| format!("{d:?}")));
    println!("Expected:        {:?} (after {:.0} s of profile time)", scenario.expected, scenario.expected_at_s);
    println!("Visual frames:   {}", counts.visual_on());
    println!("Audio requests:  {}", counts.audio_requests());

    Ok(())
}
