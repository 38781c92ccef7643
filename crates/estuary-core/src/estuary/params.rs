/// Estuary model parameters.
///
/// Geometry, boundary waters, exchange rates and tidal forcing. Immutable
/// once a model has been built from them.
///
/// - `initial_volume`: mean estuary volume [m3]
/// - `depth`: mean depth [m]
/// - `river_flow_fraction`: river flow relative to estuary volume [-]
/// - `river_nitrogen`, `river_oxygen`: river water [mmol/m3]
/// - `ocean_salinity` [kg/m3], `ocean_nitrogen`, `ocean_oxygen` [mmol/m3]
/// - `gas_exchange_rate`: air-sea piston velocity [m/day]
/// - `productivity_factor`: productivity relative to normal conditions [-]
/// - `tide`: tidal forcing
use serde::{Deserialize, Serialize};

use super::constants::*;
use super::state::Concentrations;
use crate::error::{ensure_finite, ensure_positive, EstuaryError, EstuaryResult};
use crate::forcing::Tide;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub initial_volume: f64,
    pub depth: f64,
    pub river_flow_fraction: f64,
    pub river_nitrogen: f64,
    pub river_oxygen: f64,
    pub ocean_salinity: f64,
    pub ocean_nitrogen: f64,
    pub ocean_oxygen: f64,
    pub gas_exchange_rate: f64,
    pub productivity_factor: f64,
    pub tide: Tide,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            initial_volume: DEFAULT_INITIAL_VOLUME,
            depth: DEFAULT_DEPTH,
            river_flow_fraction: DEFAULT_RIVER_FLOW_FRACTION,
            river_nitrogen: DEFAULT_RIVER_NITROGEN,
            river_oxygen: DEFAULT_RIVER_OXYGEN,
            ocean_salinity: DEFAULT_OCEAN_SALINITY,
            ocean_nitrogen: DEFAULT_OCEAN_NITROGEN,
            ocean_oxygen: DEFAULT_OCEAN_OXYGEN,
            gas_exchange_rate: DEFAULT_GAS_EXCHANGE_RATE,
            productivity_factor: DEFAULT_PRODUCTIVITY_FACTOR,
            tide: Tide::None,
        }
    }
}

impl ModelParameters {
    /// Replace the tidal forcing.
    pub fn with_tide(mut self, tide: Tide) -> Self {
        self.tide = tide;
        self
    }

    /// Structural validation only.
    ///
    /// Volume and depth must be positive because they divide, and every
    /// numeric value must be finite. Physically odd but finite values
    /// (negative river flow, huge productivity) pass.
    pub fn validate(&self) -> EstuaryResult<()> {
        ensure_positive("initial_volume", self.initial_volume)?;
        ensure_positive("depth", self.depth)?;
        for (name, value) in PARAM_NAMES.iter().zip(self.to_array()) {
            ensure_finite(*name, value)?;
        }
        Ok(())
    }

    /// Surface area available for gas exchange and tidal flux [m2].
    pub fn surface_area(&self) -> f64 {
        self.initial_volume / self.depth
    }

    pub fn has_river(&self) -> bool {
        self.river_flow_fraction > 0.0
    }

    /// See [`Tide::is_active`] for the caveats of this check.
    pub fn has_tides(&self) -> bool {
        self.tide.is_active()
    }

    /// Ocean boundary concentrations.
    pub fn ocean(&self) -> Concentrations {
        Concentrations::new(self.ocean_salinity, self.ocean_nitrogen, self.ocean_oxygen)
    }

    /// Tunable parameters outside their usual range (see [`PARAM_BOUNDS`]).
    ///
    /// Purely advisory: such parameters still validate and run.
    pub fn outside_advisory_ranges(&self) -> Vec<&'static str> {
        outside_bounds(
            PARAM_BOUNDS,
            &[
                self.river_flow_fraction,
                self.river_nitrogen,
                self.gas_exchange_rate,
                self.productivity_factor,
            ],
        )
    }

    /// Build parameters from a slice in [`PARAM_NAMES`] order plus a tide.
    pub fn from_array(arr: &[f64], tide: Tide) -> EstuaryResult<Self> {
        if arr.len() != N_PARAMS {
            return Err(EstuaryError::Length {
                what: "parameters",
                expected: N_PARAMS,
                got: arr.len(),
            });
        }
        Ok(Self {
            initial_volume: arr[0],
            depth: arr[1],
            river_flow_fraction: arr[2],
            river_nitrogen: arr[3],
            river_oxygen: arr[4],
            ocean_salinity: arr[5],
            ocean_nitrogen: arr[6],
            ocean_oxygen: arr[7],
            gas_exchange_rate: arr[8],
            productivity_factor: arr[9],
            tide,
        })
    }

    pub fn to_array(&self) -> [f64; N_PARAMS] {
        [
            self.initial_volume,
            self.depth,
            self.river_flow_fraction,
            self.river_nitrogen,
            self.river_oxygen,
            self.ocean_salinity,
            self.ocean_nitrogen,
            self.ocean_oxygen,
            self.gas_exchange_rate,
            self.productivity_factor,
        ]
    }
}

/// Run-constant quantities derived once from the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context {
    pub surface_area: f64,
    pub has_river: bool,
    pub has_tides: bool,
}

impl Context {
    pub fn prepare(params: &ModelParameters) -> Self {
        Self {
            surface_area: params.surface_area(),
            has_river: params.has_river(),
            has_tides: params.has_tides(),
        }
    }
}
