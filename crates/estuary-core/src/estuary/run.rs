/// Estuary model orchestration.
///
/// - `productivity_scale()`: nitrogen feedback factor from recent history
/// - `step()`: one clamped step of any scheme
/// - `run_raw()`: march a system from t = 0 to the end time
/// - `EstuaryModel`: validated parameters and initial conditions, ready to run
use tracing::{debug, warn};

use super::outputs::{RawRun, Trajectory};
use super::params::{Context, ModelParameters};
use super::processes;
use super::state::{Concentrations, StateVector};
use crate::config::RunConfig;
use crate::error::{ensure_finite, EstuaryResult};
use crate::traits::{ForwardEuler, StateDerivative, StepScheme};

/// Upper bound on rows reserved up front; longer runs grow the buffers.
const MAX_PREALLOCATED_ROWS: usize = 1 << 20;

/// Productivity feedback factor for the next step.
///
/// Once `elapsed_hours` is past `spinup_hours`, the mean nitrate
/// concentration over the last `window` rows of `history` (all rows if
/// fewer), relative to `ocean_nitrogen`. Before that, exactly 1.0.
pub fn productivity_scale(
    history: &[StateVector],
    elapsed_hours: f64,
    spinup_hours: f64,
    window: usize,
    ocean_nitrogen: f64,
) -> f64 {
    if elapsed_hours <= spinup_hours || history.is_empty() {
        return 1.0;
    }
    let recent = &history[history.len().saturating_sub(window.max(1))..];
    let sum: f64 = recent.iter().map(StateVector::nitrogen_concentration).sum();
    sum / recent.len() as f64 / ocean_nitrogen
}

/// Advance one step ending at `hours` and clamp negatives to zero.
pub fn step<D, S>(
    system: &D,
    scheme: &S,
    state: &StateVector,
    hours: f64,
    dt: f64,
    productivity_scale: f64,
) -> StateVector
where
    D: StateDerivative + ?Sized,
    S: StepScheme,
{
    scheme
        .advance(system, state, hours, dt, productivity_scale)
        .clamp_non_negative()
}

/// March `system` from `initial` at t = 0 until the end time is reached.
///
/// Time accumulates by repeated addition of the step, so the final time may
/// overshoot `end_time_hours` by less than one step and a step that does
/// not divide the end time exactly can add a row.
pub fn run_raw<D, S>(
    system: &D,
    scheme: &S,
    initial: StateVector,
    config: &RunConfig,
    ocean_nitrogen: f64,
) -> EstuaryResult<RawRun>
where
    D: StateDerivative + ?Sized,
    S: StepScheme,
{
    config.validate()?;

    let dt = config.time_step_hours;
    let end = config.end_time_hours;
    let spinup = config.spinup_hours;
    let window = config.feedback_window();

    let mut out = RawRun::with_capacity(config.expected_rows().min(MAX_PREALLOCATED_ROWS));
    out.push(0.0, initial, 1.0);
    debug!(dt, end, spinup, window, "starting estuary run");

    let mut t = 0.0;
    let mut feedback_active = false;
    let mut collapsed = false;

    while t < end {
        let Some(&state) = out.states.last() else {
            break;
        };

        let p = productivity_scale(&out.states, t, spinup, window, ocean_nitrogen);
        if !feedback_active && t > spinup {
            feedback_active = true;
            debug!(hours = t, productivity_scale = p, "productivity feedback active");
        }

        t += dt;
        let next = step(system, scheme, &state, t, dt, p);

        if !collapsed && next.volume == 0.0 {
            collapsed = true;
            warn!(
                hours = t,
                "estuary volume collapsed to zero, concentrations are undefined from here on"
            );
        }

        out.push(t, next, p);
    }

    debug!(rows = out.len(), final_hours = t, "estuary run finished");
    Ok(out)
}

/// A validated estuary ready to be integrated.
#[derive(Debug, Clone)]
pub struct EstuaryModel {
    params: ModelParameters,
    initial: Concentrations,
    context: Context,
}

impl EstuaryModel {
    pub fn new(params: ModelParameters, initial: Concentrations) -> EstuaryResult<Self> {
        params.validate()?;
        ensure_finite("initial_salinity", initial.salinity)?;
        ensure_finite("initial_nitrogen", initial.nitrogen)?;
        ensure_finite("initial_oxygen", initial.oxygen)?;

        let context = Context::prepare(&params);
        debug!(
            surface_area = context.surface_area,
            has_river = context.has_river,
            has_tides = context.has_tides,
            "estuary model built"
        );
        Ok(Self {
            params,
            initial,
            context,
        })
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub fn initial_conditions(&self) -> &Concentrations {
        &self.initial
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn surface_area(&self) -> f64 {
        self.context.surface_area
    }

    pub fn has_river(&self) -> bool {
        self.context.has_river
    }

    pub fn has_tides(&self) -> bool {
        self.context.has_tides
    }

    /// Extensive state at t = 0: `(V0, S0·V0, N0·V0, O0·V0)`.
    pub fn initial_state(&self) -> StateVector {
        StateVector::from_concentrations(self.params.initial_volume, &self.initial)
    }

    /// Integrate with forward Euler and post-process into a trajectory.
    pub fn run(&self, config: &RunConfig) -> EstuaryResult<Trajectory> {
        self.run_with_scheme(config, &ForwardEuler)
    }

    pub fn run_with_scheme<S: StepScheme>(
        &self,
        config: &RunConfig,
        scheme: &S,
    ) -> EstuaryResult<Trajectory> {
        let raw = run_raw(
            self,
            scheme,
            self.initial_state(),
            config,
            self.params.ocean_nitrogen,
        )?;
        Ok(raw.into_trajectory(self.params.initial_volume, self.context.surface_area))
    }

    /// Forward Euler run without post-processing, in extensive units.
    pub fn run_raw(&self, config: &RunConfig) -> EstuaryResult<RawRun> {
        run_raw(
            self,
            &ForwardEuler,
            self.initial_state(),
            config,
            self.params.ocean_nitrogen,
        )
    }
}

impl StateDerivative for EstuaryModel {
    fn derivative(&self, state: &StateVector, hours: f64, productivity_scale: f64) -> StateVector {
        processes::derivative(state, hours, productivity_scale, &self.params, &self.context)
    }
}
