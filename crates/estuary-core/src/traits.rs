use crate::estuary::state::StateVector;

/// Right-hand side of the box model ODE system.
///
/// Implementors return dy/dt in extensive units per hour for a state `y`,
/// an evaluation time in hours and a productivity scale factor. The
/// evaluation must be pure: no interior state may change between calls.
pub trait StateDerivative {
    fn derivative(&self, state: &StateVector, hours: f64, productivity_scale: f64) -> StateVector;
}

/// Fixed-step explicit time-marching scheme.
///
/// `hours` is the time at the END of the step, which is where the
/// derivative is evaluated. Clamping is the integrator's job, not the
/// scheme's.
pub trait StepScheme {
    fn advance<D: StateDerivative + ?Sized>(
        &self,
        system: &D,
        state: &StateVector,
        hours: f64,
        dt: f64,
        productivity_scale: f64,
    ) -> StateVector;
}

/// Forward (explicit) Euler: `y + dt * f(y, t, P)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardEuler;

impl StepScheme for ForwardEuler {
    fn advance<D: StateDerivative + ?Sized>(
        &self,
        system: &D,
        state: &StateVector,
        hours: f64,
        dt: f64,
        productivity_scale: f64,
    ) -> StateVector {
        *state + system.derivative(state, hours, productivity_scale) * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dy/dt = (1, -2, t, P) regardless of state.
    struct Linear;

    impl StateDerivative for Linear {
        fn derivative(&self, _state: &StateVector, hours: f64, p: f64) -> StateVector {
            StateVector::new(1.0, -2.0, hours, p)
        }
    }

    #[test]
    fn forward_euler_single_step() {
        let y = StateVector::new(10.0, 10.0, 0.0, 0.0);
        let next = ForwardEuler.advance(&Linear, &y, 3.0, 0.5, 4.0);
        assert_eq!(next, StateVector::new(10.5, 9.0, 1.5, 2.0));
    }

    #[test]
    fn forward_euler_does_not_clamp() {
        let y = StateVector::new(0.0, 0.5, 0.0, 0.0);
        let next = ForwardEuler.advance(&Linear, &y, 0.0, 1.0, 1.0);
        assert_eq!(next.salt, -1.5);
    }
}
