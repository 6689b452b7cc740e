//! Orbital kinematics
//!
//! Orbits are fixed circular curves, not simulated forces. Both angles are
//! pure functions of the body and the accumulated day count and are never
//! integrated frame to frame.

use orrery_core::constants::HOURS_PER_DAY;
use orrery_core::CelestialBody;
use std::f64::consts::{PI, TAU};

/// Revolution angle (radians) about the parent, `None` if the body has no
/// positive period.
///
/// The result is deliberately not wrapped: it grows without bound with `t`,
/// and only its sine and cosine are ever consumed. Precision therefore
/// degrades slowly over very long sessions.
pub fn revolution_angle(body: &CelestialBody, days: f64) -> Option<f64> {
    let period = body.revolution_period()?;
    Some(TAU * (days / period) + body.phase_offset.to_radians())
}

/// Self-rotation angle (radians), `None` if the body does not spin.
/// Negative day lengths spin retrograde.
pub fn self_rotation_angle(body: &CelestialBody, days: f64) -> Option<f64> {
    if !body.spins() {
        return None;
    }
    let day_length_days = body.day_length / HOURS_PER_DAY;
    Some(TAU * days / day_length_days)
}

/// Both angles at once
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyAngles {
    pub revolution: Option<f64>,
    pub self_rotation: Option<f64>,
}

impl BodyAngles {
    pub fn at(body: &CelestialBody, days: f64) -> Self {
        Self {
            revolution: revolution_angle(body, days),
            self_rotation: self_rotation_angle(body, days),
        }
    }
}

/// Wrap an angle into (-π, π]
pub fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Signed difference `current - previous`, corrected once for a crossing of ±π
pub fn shortest_delta(previous: f64, current: f64) -> f64 {
    let delta = current - previous;
    if delta > PI {
        delta - TAU
    } else if delta < -PI {
        delta + TAU
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::BodyKind;

    fn earth() -> CelestialBody {
        CelestialBody::new("Earth", BodyKind::Planet, 6371.0)
            .orbiting("Sun", 149.6, 365.26)
            .with_day_length(23.93)
            .with_phase_offset(90.0)
    }

    #[test]
    fn test_phase_offset_at_zero() {
        let angle = revolution_angle(&earth(), 0.0).unwrap();
        assert!((angle - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_revolution_periodic() {
        let body = earth();
        for t in [0.0, 1.5, 100.0, 365.26, 9999.0] {
            let a = revolution_angle(&body, t).unwrap();
            let b = revolution_angle(&body, t + 365.26).unwrap();
            assert!((b - a - TAU).abs() < 1e-9, "t={t}: {a} -> {b}");
        }
    }

    #[test]
    fn test_revolution_continuous() {
        let body = earth();
        let dt = 1e-6;
        let mut last = revolution_angle(&body, 0.0).unwrap();
        for i in 1..1000 {
            let t = i as f64 * 0.37;
            let a = revolution_angle(&body, t).unwrap();
            let b = revolution_angle(&body, t + dt).unwrap();
            assert!((b - a).abs() < 1e-6);
            assert!(a > last, "angle is monotonic for a positive period");
            last = a;
        }
    }

    #[test]
    fn test_no_revolution_without_period() {
        let mut body = earth();
        body.period = None;
        assert_eq!(revolution_angle(&body, 10.0), None);
        body.period = Some(0.0);
        assert_eq!(revolution_angle(&body, 10.0), None);
        body.period = Some(-3.0);
        assert_eq!(revolution_angle(&body, 10.0), None);
    }

    #[test]
    fn test_self_rotation() {
        let body = earth();
        // one sidereal day of 23.93 hours is one full turn
        let angle = self_rotation_angle(&body, 23.93 / 24.0).unwrap();
        assert!((angle - TAU).abs() < 1e-12);

        let venus = CelestialBody::new("Venus", BodyKind::Planet, 6051.8).with_day_length(-5832.5);
        assert!(self_rotation_angle(&venus, 1.0).unwrap() < 0.0);

        let still = CelestialBody::new("Rock", BodyKind::Moon, 1.0);
        assert_eq!(self_rotation_angle(&still, 1.0), None);
    }

    #[test]
    fn test_long_session_precision() {
        // Unwrapped angles keep periodicity, with error growing with magnitude
        let body = earth();
        for t in [1e3, 1e6] {
            let a = revolution_angle(&body, t).unwrap();
            let b = revolution_angle(&body, t + 365.26).unwrap();
            let tolerance = a.abs() * f64::EPSILON * 16.0;
            assert!((b - a - TAU).abs() <= tolerance.max(1e-9), "t={t}");
        }

        let far = revolution_angle(&body, 1e9).unwrap();
        assert!(far.is_finite());
        assert!(far.sin().abs() <= 1.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-12);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_angle(-7.0) - (-7.0 + TAU)).abs() < 1e-12);
    }

    #[test]
    fn test_shortest_delta_across_wrap() {
        let d = shortest_delta(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-12);
        let d = shortest_delta(-PI + 0.1, PI - 0.1);
        assert!((d + 0.2).abs() < 1e-12);
        assert!((shortest_delta(0.2, 0.5) - 0.3).abs() < 1e-12);
    }
}
