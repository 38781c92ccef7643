/// Estuary box model.
///
/// A single well-mixed estuary exchanging water with a river and the ocean.
/// Four extensive state variables (volume, salt, nitrate and oxygen mass)
/// are marched forward in time under tidal forcing, river throughput,
/// air-sea gas exchange and a diurnal biological cycle with nitrate
/// feedback.
pub mod constants;
pub mod outputs;
pub mod params;
pub mod processes;
pub mod run;
pub mod state;
