/// Estuary model numerical constants and model contract.
///
/// Centralises the fixed values used throughout the box model: the
/// biological forcing shape, tidal defaults, feedback window, diagnostic
/// thresholds, default scenario values and advisory parameter ranges.

// -- Biology --

/// Oxygen produced per unit nitrogen taken up (154:16).
pub const OXYGEN_PER_NITROGEN: f64 = 154.0 / 16.0;

/// Amplitude of the diurnal nitrogen uptake term [mmol/m2/day].
pub const PRODUCTION_AMPLITUDE: f64 = 125.0 * 16.0 / 154.0;

/// Phase offset of the diurnal production cycle [h].
pub const DIURNAL_PHASE_HOURS: f64 = 0.75;

pub const HOURS_PER_DAY: f64 = 24.0;

/// Trailing window used to average nitrogen for productivity feedback [h].
pub const FEEDBACK_WINDOW_HOURS: f64 = 24.0;

// -- Tides --

/// Semidiurnal tidal period [h].
pub const SEMIDIURNAL_PERIOD_HOURS: f64 = 12.45;

/// Semidiurnal tidal amplitude [m/hr].
pub const SEMIDIURNAL_AMPLITUDE: f64 = 0.5;

/// Probe times for the tide liveness heuristic [h].
pub const TIDE_PROBE_HOURS: [f64; 2] = [1.15, 1.85];

// -- Diagnostics --

/// Oxygen concentration below which the estuary counts as hypoxic [mmol/m3].
pub const HYPOXIA_THRESHOLD: f64 = 60.0;

// -- Defaults --

pub const DEFAULT_INITIAL_VOLUME: f64 = 1e9;
pub const DEFAULT_DEPTH: f64 = 5.0;
pub const DEFAULT_RIVER_FLOW_FRACTION: f64 = 0.05;
pub const DEFAULT_RIVER_NITROGEN: f64 = 100.0;
pub const DEFAULT_RIVER_OXYGEN: f64 = 231.2;
pub const DEFAULT_OCEAN_SALINITY: f64 = 35.0;
pub const DEFAULT_OCEAN_NITROGEN: f64 = 20.0;
pub const DEFAULT_OCEAN_OXYGEN: f64 = 231.2;
pub const DEFAULT_GAS_EXCHANGE_RATE: f64 = 3.0;
pub const DEFAULT_PRODUCTIVITY_FACTOR: f64 = 1.0;

pub const DEFAULT_TIME_STEP_HOURS: f64 = 1.0;
pub const DEFAULT_END_TIME_HOURS: f64 = 1000.0;
pub const DEFAULT_SPINUP_HOURS: f64 = 48.0;

/// Run length of the interactive preset: six weeks [h].
pub const INTERACTIVE_END_TIME_HOURS: f64 = 24.0 * 42.0;

// -- Model contract constants --

/// Numeric parameter names in array order.
pub const PARAM_NAMES: &[&str] = &[
    "initial_volume",
    "depth",
    "river_flow_fraction",
    "river_nitrogen",
    "river_oxygen",
    "ocean_salinity",
    "ocean_nitrogen",
    "ocean_oxygen",
    "gas_exchange_rate",
    "productivity_factor",
];

/// Number of numeric parameters.
pub const N_PARAMS: usize = 10;

/// State component names in array order (extensive units).
pub const STATE_NAMES: &[&str] = &["volume", "salt", "nitrogen", "oxygen"];

/// Number of elements in the state vector.
pub const STATE_SIZE: usize = 4;

// -- Parameter ranges --

/// Advisory range for a parameter: (min, max). Not enforced by the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both ends. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// River flow as a fraction of estuary volume [-].
pub const RIVER_FLOW_FRACTION_BOUNDS: Bounds = Bounds::new(0.0, 0.5);

/// River nitrate concentration [mmol/m3].
pub const RIVER_NITROGEN_BOUNDS: Bounds = Bounds::new(0.0, 200.0);

/// Gas exchange piston velocity [m/day].
pub const GAS_EXCHANGE_RATE_BOUNDS: Bounds = Bounds::new(1.0, 5.0);

/// Productivity relative to normal conditions [-].
pub const PRODUCTIVITY_FACTOR_BOUNDS: Bounds = Bounds::new(0.5, 2.0);

/// Initial salinity [kg/m3].
pub const INITIAL_SALINITY_BOUNDS: Bounds = Bounds::new(0.0, 40.0);

/// Initial nitrate concentration [mmol/m3].
pub const INITIAL_NITROGEN_BOUNDS: Bounds = Bounds::new(0.0, 100.0);

/// Initial dissolved oxygen [mmol/m3].
pub const INITIAL_OXYGEN_BOUNDS: Bounds = Bounds::new(200.0, 300.0);

/// Advisory ranges of the tunable parameters, by name.
pub const PARAM_BOUNDS: &[(&str, Bounds)] = &[
    ("river_flow_fraction", RIVER_FLOW_FRACTION_BOUNDS),
    ("river_nitrogen", RIVER_NITROGEN_BOUNDS),
    ("gas_exchange_rate", GAS_EXCHANGE_RATE_BOUNDS),
    ("productivity_factor", PRODUCTIVITY_FACTOR_BOUNDS),
];

/// Advisory ranges of the initial concentrations, by name.
pub const INITIAL_BOUNDS: &[(&str, Bounds)] = &[
    ("initial_salinity", INITIAL_SALINITY_BOUNDS),
    ("initial_nitrogen", INITIAL_NITROGEN_BOUNDS),
    ("initial_oxygen", INITIAL_OXYGEN_BOUNDS),
];

/// Names in `bounds` whose paired value falls outside its range.
pub fn outside_bounds(bounds: &[(&'static str, Bounds)], values: &[f64]) -> Vec<&'static str> {
    bounds
        .iter()
        .zip(values)
        .filter(|&(&(_, range), &value)| !range.contains(value))
        .map(|(&(name, _), _)| name)
        .collect()
}
