//! Estuary model outputs.
//!
//! `RawRun` is the extensive state stack produced by the integrator.
//! `TrajectoryRow` is one post-processed row and `Trajectory` the full
//! column-oriented table handed to callers.
use estuary_macros::Timeseries;
use serde::Serialize;

use super::constants::{HOURS_PER_DAY, HYPOXIA_THRESHOLD};
use super::state::StateVector;
use crate::metrics::{column_max, column_mean, column_min, hours_below};

/// One output row.
///
/// `volume` is the percent deviation from the initial volume; `salinity`,
/// `nitrogen` and `oxygen` are concentrations; `tidal_height` is V / area
/// in metres. `productivity_scale` is the factor applied on the step that
/// produced this row (1.0 for the initial row).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Timeseries)]
#[timeseries(name = "Trajectory")]
pub struct TrajectoryRow {
    pub time: f64,
    pub day: f64,
    pub volume: f64,
    pub salinity: f64,
    pub nitrogen: f64,
    pub oxygen: f64,
    pub tidal_height: f64,
    pub productivity_scale: f64,
}

/// Raw integrator output in extensive units, before post-processing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRun {
    pub times: Vec<f64>,
    pub states: Vec<StateVector>,
    pub productivity_scales: Vec<f64>,
}

impl RawRun {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            times: Vec::with_capacity(n),
            states: Vec::with_capacity(n),
            productivity_scales: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, time: f64, state: StateVector, productivity_scale: f64) {
        self.times.push(time);
        self.states.push(state);
        self.productivity_scales.push(productivity_scale);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Convert the extensive stack into the output table.
    ///
    /// Tracers are divided by volume, tidal height is volume over
    /// `surface_area`, and only then is volume turned into a percent change
    /// relative to `initial_volume`. Zero volumes yield non-finite
    /// concentrations; they are passed through unchanged.
    pub fn into_trajectory(self, initial_volume: f64, surface_area: f64) -> Trajectory {
        let mut out = Trajectory::with_capacity(self.len());
        for ((&time, state), &productivity_scale) in self
            .times
            .iter()
            .zip(&self.states)
            .zip(&self.productivity_scales)
        {
            let c = state.concentrations();
            let tidal_height = state.volume / surface_area;
            out.push(&TrajectoryRow {
                time,
                day: time / HOURS_PER_DAY,
                volume: 100.0 * (state.volume - initial_volume) / initial_volume,
                salinity: c.salinity,
                nitrogen: c.nitrogen,
                oxygen: c.oxygen,
                tidal_height,
                productivity_scale,
            });
        }
        out
    }
}

/// Min / max / mean of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ColumnStats {
    pub fn of(values: &[f64]) -> Self {
        Self {
            min: column_min(values),
            max: column_max(values),
            mean: column_mean(values),
        }
    }
}

/// Whole-run summary used by the CLI and for axis scaling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectorySummary {
    pub rows: usize,
    pub end_time: f64,
    pub volume: ColumnStats,
    pub salinity: ColumnStats,
    pub nitrogen: ColumnStats,
    pub oxygen: ColumnStats,
    pub tidal_height: ColumnStats,
    /// Hours with oxygen below the hypoxia threshold after spin-up.
    pub hypoxic_hours: f64,
    pub last: Option<TrajectoryRow>,
}

impl Trajectory {
    /// The final row, if any.
    pub fn last(&self) -> Option<TrajectoryRow> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }

    /// Rows in order.
    pub fn rows(&self) -> impl Iterator<Item = TrajectoryRow> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// Hours with oxygen below `threshold` after `after` hours.
    pub fn hypoxic_hours(&self, threshold: f64, after: f64) -> f64 {
        hours_below(&self.time, &self.oxygen, threshold, after)
    }

    pub fn summary(&self, spinup_hours: f64) -> TrajectorySummary {
        TrajectorySummary {
            rows: self.len(),
            end_time: self.time.last().copied().unwrap_or(0.0),
            volume: ColumnStats::of(&self.volume),
            salinity: ColumnStats::of(&self.salinity),
            nitrogen: ColumnStats::of(&self.nitrogen),
            oxygen: ColumnStats::of(&self.oxygen),
            tidal_height: ColumnStats::of(&self.tidal_height),
            hypoxic_hours: self.hypoxic_hours(HYPOXIA_THRESHOLD, spinup_hours),
            last: self.last(),
        }
    }
}
