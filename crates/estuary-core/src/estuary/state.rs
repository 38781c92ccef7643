/// Estuary model state variables.
///
/// The state is kept in extensive units so that mass balance is linear in
/// the fluxes:
/// - `volume`: V [m3]
/// - `salt`: salinity × V [kg]
/// - `nitrogen`: nitrate × V [mmol]
/// - `oxygen`: dissolved oxygen × V [mmol]
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use super::constants::{
    outside_bounds, DEFAULT_OCEAN_NITROGEN, DEFAULT_OCEAN_OXYGEN, DEFAULT_OCEAN_SALINITY,
    INITIAL_BOUNDS, STATE_SIZE,
};
use crate::error::{EstuaryError, EstuaryResult};

/// Intensive concentrations of the three tracers.
///
/// Salinity in kg/m3, nitrogen and oxygen in mmol/m3. Used for initial
/// conditions and boundary waters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Concentrations {
    pub salinity: f64,
    pub nitrogen: f64,
    pub oxygen: f64,
}

impl Concentrations {
    pub fn new(salinity: f64, nitrogen: f64, oxygen: f64) -> Self {
        Self {
            salinity,
            nitrogen,
            oxygen,
        }
    }

    /// Initial concentrations outside their usual range (see `INITIAL_BOUNDS`).
    pub fn outside_advisory_ranges(&self) -> Vec<&'static str> {
        outside_bounds(INITIAL_BOUNDS, &[self.salinity, self.nitrogen, self.oxygen])
    }
}

impl Default for Concentrations {
    /// Ocean water: 35 kg/m3 salt, 20 mmol/m3 nitrate, 231.2 mmol/m3 oxygen.
    fn default() -> Self {
        Self::new(
            DEFAULT_OCEAN_SALINITY,
            DEFAULT_OCEAN_NITROGEN,
            DEFAULT_OCEAN_OXYGEN,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub volume: f64,
    pub salt: f64,
    pub nitrogen: f64,
    pub oxygen: f64,
}

impl StateVector {
    pub fn new(volume: f64, salt: f64, nitrogen: f64, oxygen: f64) -> Self {
        Self {
            volume,
            salt,
            nitrogen,
            oxygen,
        }
    }

    /// Build an extensive state from a volume and tracer concentrations.
    pub fn from_concentrations(volume: f64, c: &Concentrations) -> Self {
        Self::new(
            volume,
            c.salinity * volume,
            c.nitrogen * volume,
            c.oxygen * volume,
        )
    }

    /// Tracer concentrations. Non-finite when the volume is zero.
    pub fn concentrations(&self) -> Concentrations {
        Concentrations::new(
            self.salt / self.volume,
            self.nitrogen / self.volume,
            self.oxygen / self.volume,
        )
    }

    /// Nitrate concentration alone, used by the productivity feedback.
    pub fn nitrogen_concentration(&self) -> f64 {
        self.nitrogen / self.volume
    }

    /// Set every negative component to exactly zero.
    ///
    /// Components are treated independently. NaN compares false and is left
    /// untouched.
    pub fn clamp_non_negative(self) -> Self {
        let clamp = |x: f64| if x < 0.0 { 0.0 } else { x };
        Self::new(
            clamp(self.volume),
            clamp(self.salt),
            clamp(self.nitrogen),
            clamp(self.oxygen),
        )
    }

    pub fn to_array(&self) -> [f64; STATE_SIZE] {
        [self.volume, self.salt, self.nitrogen, self.oxygen]
    }

    pub fn from_slice(arr: &[f64]) -> EstuaryResult<Self> {
        if arr.len() != STATE_SIZE {
            return Err(EstuaryError::Length {
                what: "state elements",
                expected: STATE_SIZE,
                got: arr.len(),
            });
        }
        Ok(Self::new(arr[0], arr[1], arr[2], arr[3]))
    }
}

impl Add for StateVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.volume + rhs.volume,
            self.salt + rhs.salt,
            self.nitrogen + rhs.nitrogen,
            self.oxygen + rhs.oxygen,
        )
    }
}

impl Mul<f64> for StateVector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(
            self.volume * rhs,
            self.salt * rhs,
            self.nitrogen * rhs,
            self.oxygen * rhs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_ranges_flag_unusual_initial_water() {
        assert!(Concentrations::default().outside_advisory_ranges().is_empty());
        let hypoxic = Concentrations::new(30.0, 120.0, 61.0);
        assert_eq!(
            hypoxic.outside_advisory_ranges(),
            ["initial_nitrogen", "initial_oxygen"]
        );
    }

    #[test]
    fn from_concentrations_scales_by_volume() {
        let s = StateVector::from_concentrations(1e9, &Concentrations::new(35.0, 20.0, 231.2));
        assert_eq!(s.volume, 1e9);
        assert_eq!(s.salt, 35e9);
        assert_eq!(s.nitrogen, 20e9);
        assert_eq!(s.oxygen, 231.2 * 1e9);
    }

    #[test]
    fn concentrations_divide_by_volume() {
        let s = StateVector::new(2.0, 70.0, 40.0, 10.0);
        assert_eq!(s.concentrations(), Concentrations::new(35.0, 20.0, 5.0));
        assert_eq!(s.nitrogen_concentration(), 20.0);
    }

    #[test]
    fn zero_volume_gives_non_finite_concentrations() {
        let s = StateVector::new(0.0, 1.0, 0.0, 1.0);
        let c = s.concentrations();
        assert!(c.salinity.is_infinite());
        assert!(c.nitrogen.is_nan());
    }

    #[test]
    fn clamp_zeroes_negatives_independently() {
        let s = StateVector::new(-1.0, 2.0, -0.0001, 0.0).clamp_non_negative();
        assert_eq!(s, StateVector::new(0.0, 2.0, 0.0, 0.0));
    }

    #[test]
    fn clamp_leaves_nan_alone() {
        let s = StateVector::new(f64::NAN, -3.0, 1.0, 1.0).clamp_non_negative();
        assert!(s.volume.is_nan());
        assert_eq!(s.salt, 0.0);
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = StateVector::new(1.0, 2.0, 3.0, 4.0);
        let b = StateVector::new(0.5, 0.5, 0.5, 0.5);
        assert_eq!(a + b * 2.0, StateVector::new(2.0, 3.0, 4.0, 5.0));
    }

    #[test]
    fn to_array_from_slice_roundtrip() {
        let s = StateVector::new(1e9, 35e9, 20e9, 231.2e9);
        assert_eq!(StateVector::from_slice(&s.to_array()).unwrap(), s);
    }

    #[test]
    fn from_slice_wrong_length() {
        assert!(StateVector::from_slice(&[1.0, 2.0, 3.0]).is_err());
        assert!(StateVector::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_err());
    }
}
