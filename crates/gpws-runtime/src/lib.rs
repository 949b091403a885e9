//! Runtime surface for the terrain-avoidance core: configuration, logging,
//! output ports and the timer-driven alert loop.

pub mod config;
pub mod logging;
pub mod loops;
pub mod outputs;

pub use config::{Config, ConfigError};
pub use loops::alert_loop::{AlertRuntime, AlertSequencer, SequencerHandle};
pub use outputs::{AlertOutputState, AudioAlert, AudioError, Clock, ManualClock, SystemClock, VisualAlert};
