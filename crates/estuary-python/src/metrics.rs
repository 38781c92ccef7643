use numpy::PyReadonlyArray1;
use pyo3::prelude::*;

use crate::convert::{checked_slice, contiguous_slice};

use estuary_core::estuary::constants::HYPOXIA_THRESHOLD;
use estuary_core::metrics;

/// Total hours with `values` below `threshold` after time `after`.
#[pyfunction]
#[pyo3(signature = (times, values, threshold=HYPOXIA_THRESHOLD, after=0.0))]
fn hours_below<'py>(
    times: PyReadonlyArray1<'py, f64>,
    values: PyReadonlyArray1<'py, f64>,
    threshold: f64,
    after: f64,
) -> PyResult<f64> {
    let t = contiguous_slice(&times)?;
    let v = checked_slice(&values, t.len(), "values")?;
    Ok(metrics::hours_below(t, v, threshold, after))
}

/// Largest, smallest and mean finite value of a column, NaN when empty.
#[pyfunction]
fn column_stats<'py>(values: PyReadonlyArray1<'py, f64>) -> PyResult<(f64, f64, f64)> {
    let v = contiguous_slice(&values)?;
    Ok((
        metrics::column_min(v),
        metrics::column_max(v),
        metrics::column_mean(v),
    ))
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "metrics")?;
    m.add_function(wrap_pyfunction!(hours_below, &m)?)?;
    m.add_function(wrap_pyfunction!(column_stats, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
