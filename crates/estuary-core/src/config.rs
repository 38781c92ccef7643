//! Run control and scenario configuration.
//!
//! `RunConfig` carries the three run-control scalars. `Scenario` bundles
//! parameters, initial conditions and run control into one serde document
//! so a run can be described in JSON.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, ensure_positive, EstuaryError, EstuaryResult};
use crate::estuary::constants::{
    DEFAULT_END_TIME_HOURS, DEFAULT_SPINUP_HOURS, DEFAULT_TIME_STEP_HOURS, FEEDBACK_WINDOW_HOURS,
    INTERACTIVE_END_TIME_HOURS,
};
use crate::estuary::outputs::Trajectory;
use crate::estuary::params::ModelParameters;
use crate::estuary::run::EstuaryModel;
use crate::estuary::state::Concentrations;

/// Time-marching controls, all in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Fixed step size, > 0.
    pub time_step_hours: f64,
    /// Total simulated duration, >= 0.
    pub end_time_hours: f64,
    /// Time after which productivity feedback switches on, >= 0.
    pub spinup_hours: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            time_step_hours: DEFAULT_TIME_STEP_HOURS,
            end_time_hours: DEFAULT_END_TIME_HOURS,
            spinup_hours: DEFAULT_SPINUP_HOURS,
        }
    }
}

impl RunConfig {
    pub fn new(time_step_hours: f64, end_time_hours: f64, spinup_hours: f64) -> Self {
        Self {
            time_step_hours,
            end_time_hours,
            spinup_hours,
        }
    }

    /// Reject configurations whose loop would divide by zero or never end.
    pub fn validate(&self) -> EstuaryResult<()> {
        ensure_positive("time_step_hours", self.time_step_hours)?;
        ensure_non_negative("end_time_hours", self.end_time_hours)?;
        ensure_non_negative("spinup_hours", self.spinup_hours)?;
        if self.end_time_hours + self.time_step_hours <= self.end_time_hours {
            return Err(EstuaryError::StepTooSmall {
                time_step_hours: self.time_step_hours,
                end_time_hours: self.end_time_hours,
            });
        }
        Ok(())
    }

    /// Number of trailing rows averaged by the productivity feedback.
    pub fn feedback_window(&self) -> usize {
        (FEEDBACK_WINDOW_HOURS / self.time_step_hours).ceil() as usize
    }

    /// Row count of a run, ignoring accumulated rounding in the time sum.
    pub fn expected_rows(&self) -> usize {
        (self.end_time_hours / self.time_step_hours).ceil() as usize + 1
    }
}

/// A complete, serializable description of one model run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub parameters: ModelParameters,
    pub initial: Concentrations,
    pub run: RunConfig,
}

impl Scenario {
    /// Six-week preset used by the interactive dashboard.
    pub fn interactive_default() -> Self {
        Self {
            run: RunConfig {
                end_time_hours: INTERACTIVE_END_TIME_HOURS,
                ..RunConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn from_json_str(s: &str) -> EstuaryResult<Self> {
        serde_json::from_str(s).map_err(|e| EstuaryError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> EstuaryResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| EstuaryError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Fails for custom tides, which have no serialized form.
    pub fn to_json_pretty(&self) -> EstuaryResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EstuaryError::Config(e.to_string()))
    }

    /// Validate everything and build the model.
    pub fn build(&self) -> EstuaryResult<EstuaryModel> {
        self.run.validate()?;
        EstuaryModel::new(self.parameters.clone(), self.initial)
    }

    /// Build and run in one go.
    pub fn execute(&self) -> EstuaryResult<Trajectory> {
        self.build()?.run(&self.run)
    }
}
