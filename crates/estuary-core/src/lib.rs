//! estuary-core: box model of an idealized estuary.
//!
//! Tracks volume, salinity, nitrate and dissolved oxygen in a single
//! well-mixed basin under tidal and river forcing. The model lives in
//! [`estuary`]; [`config`] bundles runs into serializable scenarios and
//! [`metrics`] summarises the resulting trajectories.
pub mod config;
pub mod error;
pub mod estuary;
pub mod forcing;
pub mod metrics;
pub mod traits;

pub use config::{RunConfig, Scenario};
pub use error::{EstuaryError, EstuaryResult};
pub use estuary::outputs::{Trajectory, TrajectoryRow, TrajectorySummary};
pub use estuary::params::ModelParameters;
pub use estuary::run::EstuaryModel;
pub use estuary::state::{Concentrations, StateVector};
pub use forcing::{Tide, TideErrors};
pub use traits::{ForwardEuler, StateDerivative, StepScheme};
