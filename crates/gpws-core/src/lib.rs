pub mod host;
pub mod models;
pub mod rules;
pub mod scan;
pub mod spatial;
pub mod terrain;
pub mod threat;

pub use host::HostTelemetry;
pub use models::{GeoPosition, ProjectedPoint, ThreatDecision, VehicleState, Velocity};
pub use rules::AlertThresholds;
pub use scan::{clearance_ahead, scan, Scan, ScanFault, VehicleStateSource};
pub use spatial::project;
pub use terrain::{sample_elevation, TerrainGrid, TerrainOracle, TerrainSample};
pub use threat::{assess, evaluate, projected_clearance, safety_mute, ThreatInputs, ThreatRule};
