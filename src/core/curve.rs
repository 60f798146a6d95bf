//! Fade interpolation curves.

use serde::{Deserialize, Serialize};

use crate::error::CueError;

/// Shape of a fade, applied to normalized progress in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeCurve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    SCurve,
}

impl FadeCurve {
    pub fn name(&self) -> &'static str {
        match self {
            FadeCurve::Linear => "Linear",
            FadeCurve::EaseIn => "EaseIn",
            FadeCurve::EaseOut => "EaseOut",
            FadeCurve::SCurve => "SCurve",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CueError> {
        match name {
            "Linear" => Ok(FadeCurve::Linear),
            "EaseIn" => Ok(FadeCurve::EaseIn),
            "EaseOut" => Ok(FadeCurve::EaseOut),
            "SCurve" => Ok(FadeCurve::SCurve),
            other => Err(CueError::Validation(format!("unknown fade curve '{other}'"))),
        }
    }

    /// Map linear progress to shaped progress. Input is clamped to [0, 1].
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            FadeCurve::Linear => t,
            FadeCurve::EaseIn => t * t,
            FadeCurve::EaseOut => t * (2.0 - t),
            // smoothstep
            FadeCurve::SCurve => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Interpolate between two values along a curve.
pub fn fade_value(from: f64, to: f64, progress: f64, curve: FadeCurve) -> f64 {
    from + (to - from) * curve.apply(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_exact() {
        for curve in [
            FadeCurve::Linear,
            FadeCurve::EaseIn,
            FadeCurve::EaseOut,
            FadeCurve::SCurve,
        ] {
            assert_eq!(fade_value(0.0, 100.0, 0.0, curve), 0.0);
            assert_eq!(fade_value(0.0, 100.0, 1.0, curve), 100.0);
        }
    }

    #[test]
    fn test_linear_midpoint() {
        assert_eq!(fade_value(0.0, 100.0, 0.5, FadeCurve::Linear), 50.0);
        assert_eq!(fade_value(100.0, 0.0, 0.25, FadeCurve::Linear), 75.0);
    }

    #[test]
    fn test_progress_clamped() {
        assert_eq!(fade_value(0.0, 10.0, 1.7, FadeCurve::Linear), 10.0);
        assert_eq!(fade_value(0.0, 10.0, -0.3, FadeCurve::EaseIn), 0.0);
    }

    #[test]
    fn test_curves_monotonic() {
        for curve in [FadeCurve::EaseIn, FadeCurve::EaseOut, FadeCurve::SCurve] {
            let mut prev = curve.apply(0.0);
            for i in 1..=100 {
                let v = curve.apply(i as f64 / 100.0);
                assert!(v >= prev, "{} not monotonic at {}", curve.name(), i);
                prev = v;
            }
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(FadeCurve::from_name("SCurve").unwrap(), FadeCurve::SCurve);
        assert!(FadeCurve::from_name("Bounce").is_err());
    }
}
