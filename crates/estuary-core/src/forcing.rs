//! Tidal forcing.
//!
//! A tide is a pure function of elapsed hours. Multiplied by the estuary
//! surface area it gives the net volumetric exchange with the ocean in
//! m3/hr: positive values are inflow, negative values outflow.
use std::f64::consts::PI;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::estuary::constants::{SEMIDIURNAL_AMPLITUDE, SEMIDIURNAL_PERIOD_HOURS, TIDE_PROBE_HOURS};

/// Pluggable tide function, hours -> rate of tidal height change [m/hr].
pub type TideFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Tidal forcing applied at the ocean boundary.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tide {
    /// No tidal exchange.
    #[default]
    None,
    /// Single-frequency sinusoid: `amplitude * sin(2π t / period_hours)`.
    Semidiurnal { amplitude: f64, period_hours: f64 },
    /// Constant exchange rate, mostly useful for testing the upwind branch.
    Constant { value: f64 },
    /// Any caller-provided function. Not serializable.
    #[serde(skip)]
    Custom(TideFn),
}

impl Tide {
    /// The default semidiurnal tide (0.5 m/hr amplitude, 12.45 h period).
    pub fn semidiurnal() -> Self {
        Tide::Semidiurnal {
            amplitude: SEMIDIURNAL_AMPLITUDE,
            period_hours: SEMIDIURNAL_PERIOD_HOURS,
        }
    }

    /// Wrap an arbitrary function of hours.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Tide::Custom(Arc::new(f))
    }

    /// Wrap a function of hours that can fail.
    ///
    /// A failed evaluation contributes NaN to the run, and the first error is
    /// kept in the returned [`TideErrors`] so the caller can surface it once
    /// the run is over.
    pub fn fallible<F, E>(f: F) -> (Self, TideErrors<E>)
    where
        F: Fn(f64) -> Result<f64, E> + Send + Sync + 'static,
        E: Send + 'static,
    {
        let errors = TideErrors::new();
        let sink = errors.clone();
        let tide = Tide::custom(move |hours| match f(hours) {
            Ok(value) => value,
            Err(e) => {
                sink.record(e);
                f64::NAN
            }
        });
        (tide, errors)
    }

    /// Evaluate the forcing at `hours`.
    pub fn evaluate(&self, hours: f64) -> f64 {
        match self {
            Tide::None => 0.0,
            Tide::Semidiurnal {
                amplitude,
                period_hours,
            } => amplitude * (2.0 * PI * (hours / period_hours)).sin(),
            Tide::Constant { value } => *value,
            Tide::Custom(f) => f(hours),
        }
    }

    /// Liveness heuristic: compares the forcing at two probe times.
    ///
    /// This is a sampled inequality, not a proof. A function that happens to
    /// take equal values at both probes reports `false` even though it moves
    /// water, and so does any constant.
    pub fn is_active(&self) -> bool {
        let [a, b] = TIDE_PROBE_HOURS;
        self.evaluate(a) != self.evaluate(b)
    }
}

impl fmt::Debug for Tide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tide::None => f.write_str("None"),
            Tide::Semidiurnal {
                amplitude,
                period_hours,
            } => f
                .debug_struct("Semidiurnal")
                .field("amplitude", amplitude)
                .field("period_hours", period_hours)
                .finish(),
            Tide::Constant { value } => f.debug_struct("Constant").field("value", value).finish(),
            Tide::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// First error raised by a fallible tide, shared with the tide closure.
pub struct TideErrors<E>(Arc<Mutex<Option<E>>>);

impl<E> TideErrors<E> {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }

    fn record(&self, error: E) {
        let mut slot = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(error);
        }
    }

    /// Remove and return the stored error, if any.
    pub fn take(&self) -> Option<E> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

impl<E> Clone for TideErrors<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> fmt::Debug for TideErrors<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TideErrors")
    }
}

/// Rate of tidal height change [m/hr] for the default semidiurnal tide.
pub fn basic_tidal_flow(hours: f64) -> f64 {
    0.5 * (2.0 * PI * (hours / 12.45)).sin()
}
