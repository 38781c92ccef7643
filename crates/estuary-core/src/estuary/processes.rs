/// Estuary core process functions.
///
/// Pure functions making up the right-hand side of the box model ODEs.
/// Inputs are extensive state (m3, kg, mmol) and time in hours; outputs are
/// rates per hour in the same extensive units.
use std::f64::consts::PI;

use super::constants::{
    DIURNAL_PHASE_HOURS, HOURS_PER_DAY, OXYGEN_PER_NITROGEN, PRODUCTION_AMPLITUDE,
};
use super::params::{Context, ModelParameters};
use super::state::{Concentrations, StateVector};

/// Biological production minus respiration, as nitrogen uptake [mmol/m2/day].
///
/// Diurnal sinusoid with a fixed phase, scaled by the system productivity
/// and the feedback factor. Negative values are net respiration.
pub fn biological_production(hours: f64, productivity_scale: f64, productivity_factor: f64) -> f64 {
    let phase = 2.0 * PI * (hours + DIURNAL_PHASE_HOURS) / HOURS_PER_DAY + PI;
    productivity_scale * productivity_factor * PRODUCTION_AMPLITUDE * phase.sin()
}

/// Tracer fluxes carried by the tide [per hour].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TidalExchange {
    /// Net volumetric flow, positive into the estuary [m3/hr].
    pub flow: f64,
    pub salt: f64,
    pub nitrogen: f64,
    pub oxygen: f64,
}

/// Upwind tidal transport.
///
/// Flooding water (`flow > 0`) carries ocean chemistry in; ebbing or slack
/// water (`flow <= 0`) carries the estuary's own concentrations out.
pub fn tidal_exchange(flow: f64, ocean: &Concentrations, estuary: &Concentrations) -> TidalExchange {
    let source = if flow > 0.0 { ocean } else { estuary };
    TidalExchange {
        flow,
        salt: flow * source.salinity,
        nitrogen: flow * source.nitrogen,
        oxygen: flow * source.oxygen,
    }
}

/// Evaluate dy/dt for the box model.
///
/// Divides by `state.volume`; a zero volume propagates non-finite rates.
pub fn derivative(
    state: &StateVector,
    hours: f64,
    productivity_scale: f64,
    params: &ModelParameters,
    context: &Context,
) -> StateVector {
    let area = context.surface_area;

    let j = biological_production(hours, productivity_scale, params.productivity_factor);

    let c = state.concentrations();

    let tidal = tidal_exchange(area * params.tide.evaluate(hours), &params.ocean(), &c);

    // River throughput [m3/hr]
    let river = params.river_flow_fraction * params.initial_volume;

    let d_volume = tidal.flow;

    let d_salt = -river * c.salinity + tidal.salt;

    let d_nitrogen = -j * area - river * (c.nitrogen - params.river_nitrogen) + tidal.nitrogen;

    let d_oxygen = j * OXYGEN_PER_NITROGEN * area
        + (params.gas_exchange_rate / HOURS_PER_DAY) * (params.river_oxygen - c.oxygen) * area
        - river * (c.oxygen - params.river_oxygen)
        + tidal.oxygen;

    StateVector::new(d_volume, d_salt, d_nitrogen, d_oxygen)
}
