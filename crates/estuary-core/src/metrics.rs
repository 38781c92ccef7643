//! Trajectory diagnostics.
//!
//! Scalar summaries of output columns. NaN entries (from a collapsed volume)
//! are skipped; a column with no finite entries summarises to NaN.

/// Total hours spent below `threshold` after time `after`.
///
/// Row `i` contributes the interval `times[i] - times[i-1]` when
/// `times[i] > after` and `values[i] < threshold`. The first row never
/// contributes. Used with oxygen and [`HYPOXIA_THRESHOLD`] to measure
/// hypoxia duration.
///
/// [`HYPOXIA_THRESHOLD`]: crate::estuary::constants::HYPOXIA_THRESHOLD
pub fn hours_below(times: &[f64], values: &[f64], threshold: f64, after: f64) -> f64 {
    debug_assert_eq!(times.len(), values.len(), "times and values length mismatch");
    times
        .windows(2)
        .zip(values.iter().skip(1))
        .filter(|(w, v)| w[1] > after && **v < threshold)
        .map(|(w, _)| w[1] - w[0])
        .sum()
}

/// Largest finite value, NaN if there is none.
pub fn column_max(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::max)
}

/// Smallest finite value, NaN if there is none.
pub fn column_min(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::min)
}

/// Mean of the finite values, NaN if there are none.
pub fn column_mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return f64::NAN;
    }
    sum / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_below_counts_intervals_after_cutoff() {
        let times = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let oxygen = [50.0, 50.0, 50.0, 70.0, 55.0, 40.0];
        // Rows 2, 4 and 5 are after t=1 and below 60.
        assert_eq!(hours_below(&times, &oxygen, 60.0, 1.0), 3.0);
        assert_eq!(hours_below(&times, &oxygen, 60.0, 10.0), 0.0);
    }

    #[test]
    fn hours_below_respects_uneven_steps() {
        let times = [0.0, 0.5, 2.0];
        let v = [0.0, 0.0, 0.0];
        assert_eq!(hours_below(&times, &v, 1.0, 0.0), 2.0);
    }

    #[test]
    fn hours_below_ignores_nan() {
        let times = [0.0, 1.0, 2.0];
        let v = [0.0, f64::NAN, 0.0];
        assert_eq!(hours_below(&times, &v, 1.0, 0.0), 1.0);
    }

    #[test]
    fn hours_below_empty_is_zero() {
        assert_eq!(hours_below(&[], &[], 60.0, 0.0), 0.0);
    }

    #[test]
    fn summaries_skip_non_finite() {
        let v = [3.0, f64::NAN, 1.0, f64::INFINITY, 2.0];
        assert_eq!(column_max(&v), 3.0);
        assert_eq!(column_min(&v), 1.0);
        assert_eq!(column_mean(&v), 2.0);
    }

    #[test]
    fn summaries_of_empty_are_nan() {
        assert!(column_max(&[]).is_nan());
        assert!(column_min(&[f64::NAN]).is_nan());
        assert!(column_mean(&[]).is_nan());
    }
}
