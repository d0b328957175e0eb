/// Floating point type used throughout the simulator
pub type Real = f64;

/// Floor applied to time constants and tank areas so divisions stay finite.
pub const MIN_POSITIVE: Real = 1e-6;

/// Clamp a divisor (time constant, area) to at least [`MIN_POSITIVE`].
#[inline]
pub fn floor_positive(v: Real) -> Real {
    v.max(MIN_POSITIVE)
}

/// Blend factor of a discrete first-order lag: `min(1, dt / tau)`.
#[inline]
pub fn lag_alpha(dt: Real, tau: Real) -> Real {
    (dt / floor_positive(tau)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_positive_clamps_zero_and_negative() {
        assert_eq!(floor_positive(0.0), MIN_POSITIVE);
        assert_eq!(floor_positive(-3.0), MIN_POSITIVE);
        assert_eq!(floor_positive(2.5), 2.5);
    }

    #[test]
    fn lag_alpha_saturates_at_one() {
        assert_eq!(lag_alpha(1.0, 1.0), 1.0);
        assert_eq!(lag_alpha(5.0, 1.0), 1.0);
        assert!((lag_alpha(0.5, 2.0) - 0.25).abs() < 1e-12);
        assert_eq!(lag_alpha(0.0, 1.0), 0.0);
    }

    #[test]
    fn zero_tau_jumps_to_target() {
        assert_eq!(lag_alpha(1e-3, 0.0), 1.0);
    }
}
