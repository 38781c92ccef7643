use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::convert::{checked_slice, value_error};

use estuary_core::config::RunConfig;
use estuary_core::estuary::constants::{
    DEFAULT_END_TIME_HOURS, DEFAULT_SPINUP_HOURS, DEFAULT_TIME_STEP_HOURS, INITIAL_BOUNDS,
    N_PARAMS, PARAM_BOUNDS, PARAM_NAMES, SEMIDIURNAL_AMPLITUDE, SEMIDIURNAL_PERIOD_HOURS,
    STATE_NAMES, STATE_SIZE,
};
use estuary_core::estuary::outputs::Trajectory;
use estuary_core::estuary::params::ModelParameters;
use estuary_core::estuary::run::{self, EstuaryModel};
use estuary_core::estuary::state::{Concentrations, StateVector};
use estuary_core::forcing::{Tide, TideErrors};
use estuary_core::traits::{ForwardEuler, StateDerivative};

// ---------------------------------------------------------------------------
// Typed pyclass result object
// ---------------------------------------------------------------------------

define_timeseries_result! {
    /// Estuary run results with typed numpy array attributes.
    pub struct EstuaryResult from Trajectory {
        time, day, volume, salinity, nitrogen, oxygen, tidal_height, productivity_scale,
    }
}

// ---------------------------------------------------------------------------
// Argument conversion
// ---------------------------------------------------------------------------

/// Pick the tidal forcing: a Python callable wins over `tides=True`.
///
/// A callable that raises, or returns something that is not a float,
/// contributes NaN for that evaluation. The first such error is kept and
/// re-raised by [`raise_tide_error`] once the computation is done.
fn make_tide(
    tides: bool,
    amplitude: f64,
    period_hours: f64,
    tide_func: Option<PyObject>,
) -> (Tide, Option<TideErrors<PyErr>>) {
    match tide_func {
        Some(func) => {
            let (tide, errors) = Tide::fallible(move |hours| {
                Python::with_gil(|py| func.call1(py, (hours,))?.extract::<f64>(py))
            });
            (tide, Some(errors))
        }
        None if tides => (
            Tide::Semidiurnal {
                amplitude,
                period_hours,
            },
            None,
        ),
        None => (Tide::None, None),
    }
}

fn raise_tide_error(errors: &Option<TideErrors<PyErr>>) -> PyResult<()> {
    match errors.as_ref().and_then(TideErrors::take) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn build_model(
    params: &PyReadonlyArray1<'_, f64>,
    initial: Option<&PyReadonlyArray1<'_, f64>>,
    tide: Tide,
) -> PyResult<EstuaryModel> {
    let p_slice = checked_slice(params, N_PARAMS, "params")?;
    let p = ModelParameters::from_array(p_slice, tide).map_err(value_error)?;

    let initial = match initial {
        Some(arr) => {
            let c = checked_slice(arr, 3, "initial")?;
            Concentrations::new(c[0], c[1], c[2])
        }
        None => Concentrations::new(p.ocean_salinity, p.ocean_nitrogen, p.ocean_oxygen),
    };

    EstuaryModel::new(p, initial).map_err(value_error)
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

/// Run the estuary model and return a dict of numpy arrays.
///
/// `params` holds the ten numeric parameters in `PARAM_NAMES` order.
/// `initial` holds initial salinity, nitrate and oxygen concentrations and
/// defaults to the ocean values.
#[pyfunction]
#[pyo3(name = "run")]
#[pyo3(signature = (
    params,
    initial=None,
    tides=false,
    tide_func=None,
    tide_amplitude=SEMIDIURNAL_AMPLITUDE,
    tide_period_hours=SEMIDIURNAL_PERIOD_HOURS,
    time_step_hours=DEFAULT_TIME_STEP_HOURS,
    end_time_hours=DEFAULT_END_TIME_HOURS,
    spinup_hours=DEFAULT_SPINUP_HOURS,
))]
#[allow(clippy::too_many_arguments)]
fn estuary_run<'py>(
    py: Python<'py>,
    params: PyReadonlyArray1<'py, f64>,
    initial: Option<PyReadonlyArray1<'py, f64>>,
    tides: bool,
    tide_func: Option<PyObject>,
    tide_amplitude: f64,
    tide_period_hours: f64,
    time_step_hours: f64,
    end_time_hours: f64,
    spinup_hours: f64,
) -> PyResult<Bound<'py, PyDict>> {
    let (tide, tide_errors) = make_tide(tides, tide_amplitude, tide_period_hours, tide_func);
    let model = build_model(&params, initial.as_ref(), tide);
    raise_tide_error(&tide_errors)?;
    let config = RunConfig::new(time_step_hours, end_time_hours, spinup_hours);

    let result = model?.run(&config);
    raise_tide_error(&tide_errors)?;
    let result = result.map_err(value_error)?;

    let dict = timeseries_to_dict!(
        py, result,
        time, day, volume, salinity, nitrogen, oxygen, tidal_height, productivity_scale,
    );
    Ok(dict)
}

/// Same as `run` but returns a typed `EstuaryResult`.
#[pyfunction]
#[pyo3(name = "run_result")]
#[pyo3(signature = (
    params,
    initial=None,
    tides=false,
    tide_func=None,
    tide_amplitude=SEMIDIURNAL_AMPLITUDE,
    tide_period_hours=SEMIDIURNAL_PERIOD_HOURS,
    time_step_hours=DEFAULT_TIME_STEP_HOURS,
    end_time_hours=DEFAULT_END_TIME_HOURS,
    spinup_hours=DEFAULT_SPINUP_HOURS,
))]
#[allow(clippy::too_many_arguments)]
fn estuary_run_result<'py>(
    py: Python<'py>,
    params: PyReadonlyArray1<'py, f64>,
    initial: Option<PyReadonlyArray1<'py, f64>>,
    tides: bool,
    tide_func: Option<PyObject>,
    tide_amplitude: f64,
    tide_period_hours: f64,
    time_step_hours: f64,
    end_time_hours: f64,
    spinup_hours: f64,
) -> PyResult<EstuaryResult> {
    let (tide, tide_errors) = make_tide(tides, tide_amplitude, tide_period_hours, tide_func);
    let model = build_model(&params, initial.as_ref(), tide);
    raise_tide_error(&tide_errors)?;
    let config = RunConfig::new(time_step_hours, end_time_hours, spinup_hours);

    let result = model?.run(&config);
    raise_tide_error(&tide_errors)?;
    let result = result.map_err(value_error)?;
    Ok(EstuaryResult::from_timeseries(py, result))
}

/// Evaluate dy/dt for an extensive state `(V, S·V, N·V, O·V)`.
#[pyfunction]
#[pyo3(name = "derivative")]
#[pyo3(signature = (
    state,
    params,
    hours,
    productivity_scale=1.0,
    tides=false,
    tide_func=None,
))]
fn estuary_derivative<'py>(
    py: Python<'py>,
    state: PyReadonlyArray1<'py, f64>,
    params: PyReadonlyArray1<'py, f64>,
    hours: f64,
    productivity_scale: f64,
    tides: bool,
    tide_func: Option<PyObject>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let (tide, tide_errors) =
        make_tide(tides, SEMIDIURNAL_AMPLITUDE, SEMIDIURNAL_PERIOD_HOURS, tide_func);
    let model = build_model(&params, None, tide);
    raise_tide_error(&tide_errors)?;
    let model = model?;

    let s_slice = checked_slice(&state, STATE_SIZE, "state")?;
    let y = StateVector::from_slice(s_slice).map_err(value_error)?;

    let dy = model.derivative(&y, hours, productivity_scale);
    raise_tide_error(&tide_errors)?;
    Ok(PyArray1::from_vec(py, dy.to_array().to_vec()))
}

/// One clamped forward Euler step ending at `hours`.
#[pyfunction]
#[pyo3(name = "step")]
#[pyo3(signature = (
    state,
    params,
    hours,
    dt,
    productivity_scale=1.0,
    tides=false,
    tide_func=None,
))]
#[allow(clippy::too_many_arguments)]
fn estuary_step<'py>(
    py: Python<'py>,
    state: PyReadonlyArray1<'py, f64>,
    params: PyReadonlyArray1<'py, f64>,
    hours: f64,
    dt: f64,
    productivity_scale: f64,
    tides: bool,
    tide_func: Option<PyObject>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let (tide, tide_errors) =
        make_tide(tides, SEMIDIURNAL_AMPLITUDE, SEMIDIURNAL_PERIOD_HOURS, tide_func);
    let model = build_model(&params, None, tide);
    raise_tide_error(&tide_errors)?;
    let model = model?;

    let s_slice = checked_slice(&state, STATE_SIZE, "state")?;
    let y = StateVector::from_slice(s_slice).map_err(value_error)?;

    let next = run::step(&model, &ForwardEuler, &y, hours, dt, productivity_scale);
    raise_tide_error(&tide_errors)?;
    Ok(PyArray1::from_vec(py, next.to_array().to_vec()))
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "estuary")?;
    m.add_function(wrap_pyfunction!(estuary_run, &m)?)?;
    m.add_function(wrap_pyfunction!(estuary_run_result, &m)?)?;
    m.add_function(wrap_pyfunction!(estuary_derivative, &m)?)?;
    m.add_function(wrap_pyfunction!(estuary_step, &m)?)?;
    m.add_class::<EstuaryResult>()?;

    m.add("PARAM_NAMES", PARAM_NAMES.to_vec())?;
    m.add("STATE_NAMES", STATE_NAMES.to_vec())?;

    // Slider ranges for dashboards: name -> (min, max).
    let bounds = PyDict::new(parent.py());
    for (name, range) in PARAM_BOUNDS.iter().chain(INITIAL_BOUNDS) {
        bounds.set_item(*name, (range.min, range.max))?;
    }
    m.add("PARAM_BOUNDS", bounds)?;
    parent.add_submodule(&m)?;
    Ok(())
}
