//! Easing resolver: timing-function strings to easing curves.
//!
//! Recognised forms:
//! - `ease`, `ease-in`, `ease-out`, `ease-in-out`
//! - `cubic-bezier(x1, y1, x2, y2)`
//!
//! Anything else, including a missing timing function, resolves to linear.
//!
//! ```
//! use rune_transition::easing::EasingFunction;
//!
//! let ease = EasingFunction::parse(Some("cubic-bezier(0.42, 0, 1, 1)"));
//! assert_eq!(ease, EasingFunction::CubicBezier { x1: 0.42, y1: 0.0, x2: 1.0, y2: 1.0 });
//! let progress = ease.evaluate(0.5);
//! assert!(progress < 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Easing function for transition timing.
///
/// Maps linear progress in [0, 1] to eased progress, controlling the rate of
/// change over time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing. The fallback for absent or unrecognised timing functions.
    #[default]
    Linear,

    /// CSS `ease`, equivalent to `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,

    /// CSS `ease-in`, equivalent to `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// CSS `ease-out`, equivalent to `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// CSS `ease-in-out`, equivalent to `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve through control points (x1, y1) and (x2, y2).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl EasingFunction {
    /// Resolve a timing-function directive. Never fails.
    pub fn parse(timing_function: Option<&str>) -> Self {
        let Some(raw) = timing_function else {
            return Self::Linear;
        };
        match raw.trim() {
            "ease" => Self::Ease,
            "ease-in" => Self::EaseIn,
            "ease-out" => Self::EaseOut,
            "ease-in-out" => Self::EaseInOut,
            other => parse_cubic_bezier(other).unwrap_or(Self::Linear),
        }
    }

    /// Evaluate the easing function at the given progress (clamped to [0, 1]).
    ///
    /// The result may leave [0, 1] for bezier curves with overshooting y values.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }

    /// Control points of the underlying curve, `None` for linear.
    pub fn control_points(&self) -> Option<[f32; 4]> {
        match self {
            Self::Linear => None,
            Self::Ease => Some([0.25, 0.1, 0.25, 1.0]),
            Self::EaseIn => Some([0.42, 0.0, 1.0, 1.0]),
            Self::EaseOut => Some([0.0, 0.0, 0.58, 1.0]),
            Self::EaseInOut => Some([0.42, 0.0, 0.58, 1.0]),
            Self::CubicBezier { x1, y1, x2, y2 } => Some([*x1, *y1, *x2, *y2]),
        }
    }
}

impl FromStr for EasingFunction {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(Some(s)))
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

/// Parse `cubic-bezier(a, b, c, d)`. x values are clamped into [0, 1].
fn parse_cubic_bezier(raw: &str) -> Option<EasingFunction> {
    let inner = raw
        .strip_prefix("cubic-bezier(")?
        .strip_suffix(')')?;

    let points = inner
        .split(',')
        .map(|part| part.trim().parse::<f32>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<f32>>>()?;

    let &[x1, y1, x2, y2] = points.as_slice() else {
        return None;
    };

    Some(EasingFunction::CubicBezier {
        x1: x1.clamp(0.0, 1.0),
        y1,
        x2: x2.clamp(0.0, 1.0),
        y2,
    })
}

/// Evaluate a cubic bezier curve at time t.
///
/// Newton-Raphson finds the curve parameter whose x equals the input progress,
/// then the y coordinate at that parameter is returned.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_component(y1, y2, t)
}

fn solve_bezier_x(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_component(x1, x2, t) - target_x;
        if x.abs() < 1e-6 {
            break;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }

        t -= x / dx;
        t = t.clamp(0.0, 1.0);
    }

    t
}

/// One coordinate of the curve: 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_component(p1: f32, p2: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * p1 + 3.0 * mt * t2 * p2 + t3
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f32, x2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_parse_named_curves() {
        assert_eq!(EasingFunction::parse(Some("ease")), EasingFunction::Ease);
        assert_eq!(EasingFunction::parse(Some("ease-in")), EasingFunction::EaseIn);
        assert_eq!(EasingFunction::parse(Some("ease-out")), EasingFunction::EaseOut);
        assert_eq!(
            EasingFunction::parse(Some(" ease-in-out ")),
            EasingFunction::EaseInOut
        );
    }

    #[test]
    fn test_parse_falls_back_to_linear() {
        assert_eq!(EasingFunction::parse(None), EasingFunction::Linear);
        assert_eq!(EasingFunction::parse(Some("bouncy")), EasingFunction::Linear);
        assert_eq!(EasingFunction::parse(Some("linear")), EasingFunction::Linear);
        assert_eq!(
            EasingFunction::parse(Some("cubic-bezier(0.1, 0.2, 0.3)")),
            EasingFunction::Linear
        );
        assert_eq!(
            EasingFunction::parse(Some("cubic-bezier(a, b, c, d)")),
            EasingFunction::Linear
        );
        assert_eq!(
            EasingFunction::parse(Some("cubic-bezier(0.1, 0.2, 0.3, 0.4")),
            EasingFunction::Linear
        );
    }

    #[test]
    fn test_parse_cubic_bezier_control_points() {
        let ease = EasingFunction::parse(Some("cubic-bezier(0.42, 0, 1, 1)"));
        assert_eq!(ease.control_points(), Some([0.42, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_parse_cubic_bezier_clamps_x() {
        let ease: EasingFunction = "cubic-bezier(-0.5, 2, 1.5, -1)".parse().unwrap();
        assert_eq!(ease.control_points(), Some([0.0, 2.0, 1.0, -1.0]));
    }

    #[test]
    fn test_display_roundtrip() {
        for ease in [
            EasingFunction::Linear,
            EasingFunction::Ease,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
            EasingFunction::CubicBezier {
                x1: 0.4,
                y1: 0.0,
                x2: 0.2,
                y2: 1.0,
            },
        ] {
            assert_eq!(EasingFunction::parse(Some(&ease.to_string())), ease);
        }
    }

    #[test]
    fn test_linear() {
        let ease = EasingFunction::Linear;
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(0.25), 0.25));
        assert!(approx_eq(ease.evaluate(0.75), 0.75));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_ease_in_and_out_shapes() {
        let ease_in = EasingFunction::EaseIn;
        assert!(ease_in.evaluate(0.25) < 0.25);
        assert!(ease_in.evaluate(0.5) < 0.5);

        let ease_out = EasingFunction::EaseOut;
        assert!(ease_out.evaluate(0.25) > 0.25);
        assert!(ease_out.evaluate(0.5) > 0.5);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let ease = EasingFunction::EaseInOut;
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(0.25) + ease.evaluate(0.75), 1.0));
    }

    #[test]
    fn test_named_curves_are_monotonic() {
        for ease in [
            EasingFunction::Linear,
            EasingFunction::Ease,
            EasingFunction::EaseIn,
            EasingFunction::EaseOut,
            EasingFunction::EaseInOut,
        ] {
            let mut prev = 0.0f32;
            for i in 0..=100 {
                let v = ease.evaluate(i as f32 / 100.0);
                assert!(v >= prev - EPSILON, "{ease} not monotonic at step {i}");
                prev = v;
            }
            assert!(approx_eq(ease.evaluate(1.0), 1.0));
        }
    }

    #[test]
    fn test_clamping() {
        let ease = EasingFunction::Ease;
        assert!(approx_eq(ease.evaluate(-0.5), 0.0));
        assert!(approx_eq(ease.evaluate(1.5), 1.0));
    }
}
