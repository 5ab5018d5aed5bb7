//! Interpolation engine.
//!
//! Scalar interpolation goes through the [`Interpolate`] trait. The engine
//! functions decide, per property, whether a `from -> to` pair is bound to
//! the active clock or emitted verbatim:
//!
//! - no active clock, no `from` value, or `from == to`: verbatim
//! - number to number, string to string: bound scalar
//! - transform to transform: decomposed per entry, or verbatim with a
//!   diagnostic when the stacks are incompatible or carry a matrix
//! - anything else (mixed kinds): verbatim

use indexmap::IndexMap;

use super::clock::ProgressHandle;
use super::diagnostics::{Diagnostic, DiagnosticsSink};
use super::output::{AnimatedScalar, AnimatedTransformArg, AnimatedTransformOp, OutputValue};
use super::transform::{self, TransformArg, TransformKind, TransformOp};
use super::types::{AnimatableValue, Scalar, StyleSnapshot};

/// Trait for types that can be interpolated between two values.
///
/// When t = 0.0, returns self. When t = 1.0, returns `to`.
pub trait Interpolate: Sized {
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp_f64(from: f64, to: f64, t: f32) -> f64 {
    from + (to - from) * t as f64
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp_f64(*self, *to, t)
    }
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for String {
    /// Strings sharing the same text around their numbers (`"0deg"` and
    /// `"90deg"`) interpolate every embedded number. Other pairs switch to
    /// `to` once `t` reaches 1.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        if self == to || t == 0.0 {
            return self.clone();
        }
        if t == 1.0 {
            return to.clone();
        }

        let (from_text, from_numbers) = split_numbers(self);
        let (to_text, to_numbers) = split_numbers(to);
        if from_numbers.is_empty() || from_text != to_text {
            return if t >= 1.0 { to.clone() } else { self.clone() };
        }

        let mut out = String::with_capacity(to.len());
        for (i, text) in to_text.iter().enumerate() {
            out.push_str(text);
            if let (Some(a), Some(b)) = (from_numbers.get(i), to_numbers.get(i)) {
                out.push_str(&format_number(a.interpolate(b, t)));
            }
        }
        out
    }
}

impl Interpolate for Scalar {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (_, _) if t == 1.0 => to.clone(),
            (Self::Number(a), Self::Number(b)) => Self::Number(a.interpolate(b, t)),
            (Self::String(a), Self::String(b)) => Self::String(a.interpolate(b, t)),
            _ if t >= 1.0 => to.clone(),
            _ => self.clone(),
        }
    }
}

/// Split `s` into the text around its numbers and the numbers themselves.
///
/// The text list is always one longer than the number list. Digits glued to a
/// preceding letter, `#`, `_` or `.` belong to the text (`rotate3d`, `#ff0000`).
fn split_numbers(s: &str) -> (Vec<&str>, Vec<f64>) {
    let bytes = s.as_bytes();
    let mut text = Vec::new();
    let mut numbers = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(end) = number_end(bytes, i)
            && let Ok(n) = s[i..end].parse::<f64>()
        {
            text.push(&s[literal_start..i]);
            numbers.push(n);
            literal_start = end;
            i = end;
            continue;
        }
        i += 1;
    }
    text.push(&s[literal_start..]);
    (text, numbers)
}

/// End index of a number starting at `start`, if one does.
fn number_end(bytes: &[u8], start: usize) -> Option<usize> {
    if start > 0 {
        let prev = bytes[start - 1];
        if prev.is_ascii_alphanumeric() || matches!(prev, b'#' | b'_' | b'.') {
            return None;
        }
    }

    let mut i = start;
    if matches!(bytes[i], b'-' | b'+') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }

    (digits > 0).then_some(i)
}

/// Format with at most four decimals, dropping trailing zeros.
fn format_number(n: f64) -> String {
    let formatted = format!("{n:.4}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Output value for one property of a run.
///
/// `progress` is `None` when no run is active; every property is then
/// emitted verbatim.
pub fn interpolate_value(
    property: &str,
    from: Option<&AnimatableValue>,
    to: &AnimatableValue,
    progress: Option<&ProgressHandle>,
    sink: &dyn DiagnosticsSink,
) -> OutputValue {
    let (Some(progress), Some(from)) = (progress, from) else {
        return OutputValue::from_animatable(to);
    };
    if from == to {
        return OutputValue::from_animatable(to);
    }

    match (from, to) {
        (AnimatableValue::Number(a), AnimatableValue::Number(b)) => OutputValue::Animated(
            AnimatedScalar::new(progress.clone(), Scalar::Number(*a), Scalar::Number(*b)),
        ),
        (AnimatableValue::String(a), AnimatableValue::String(b)) => {
            OutputValue::Animated(AnimatedScalar::new(
                progress.clone(),
                Scalar::String(a.clone()),
                Scalar::String(b.clone()),
            ))
        }
        (AnimatableValue::Transform(a), AnimatableValue::Transform(b)) => {
            interpolate_transform(property, a, b, progress, sink)
        }
        _ => OutputValue::from_animatable(to),
    }
}

/// Output values for every property in `to`, in `to`'s order.
pub fn interpolate_snapshot(
    from: &StyleSnapshot,
    to: &StyleSnapshot,
    progress: Option<&ProgressHandle>,
    sink: &dyn DiagnosticsSink,
) -> IndexMap<String, OutputValue> {
    to.iter()
        .map(|(property, value)| {
            let output = interpolate_value(property, from.get(property), value, progress, sink);
            (property.to_string(), output)
        })
        .collect()
}

fn interpolate_transform(
    property: &str,
    from: &[TransformOp],
    to: &[TransformOp],
    progress: &ProgressHandle,
    sink: &dyn DiagnosticsSink,
) -> OutputValue {
    let verbatim = || OutputValue::Static(transform::list_to_json(to));

    if !transform::same_shape(to, from) {
        sink.report(Diagnostic::TransformMismatch {
            property: property.to_string(),
        });
        return verbatim();
    }
    if transform::contains_matrix(to) || transform::contains_matrix(from) {
        sink.report(Diagnostic::MatrixNotAnimatable {
            property: property.to_string(),
        });
        return verbatim();
    }

    let mut entries = Vec::with_capacity(to.len());
    for (from_op, to_op) in from.iter().zip(to) {
        // Entries with no recognised kind leave nothing to bind.
        let Some((kind, to_arg)) = to_op.primary() else {
            return verbatim();
        };
        let Some(from_arg) = from_op.get(kind) else {
            return verbatim();
        };
        entries.push(AnimatedTransformOp {
            kind,
            value: interpolate_arg(kind, from_arg, to_arg, progress),
        });
    }
    OutputValue::Transform(entries)
}

fn interpolate_arg(
    kind: TransformKind,
    from: &TransformArg,
    to: &TransformArg,
    progress: &ProgressHandle,
) -> AnimatedTransformArg {
    let verbatim = || AnimatedTransformArg::Static(to.clone());
    if from == to {
        return verbatim();
    }
    let (Some(a), Some(b)) = (from.as_scalar(), to.as_scalar()) else {
        return verbatim();
    };

    let endpoints = if kind.is_numeric() {
        match (a.as_number(), b.as_number()) {
            (Some(a), Some(b)) => (Scalar::Number(a), Scalar::Number(b)),
            _ => return verbatim(),
        }
    } else {
        match (a, b) {
            (Scalar::Number(a), Scalar::Number(b)) => (Scalar::Number(a), Scalar::Number(b)),
            (a, b) => (Scalar::String(a.to_string()), Scalar::String(b.to_string())),
        }
    };

    AnimatedTransformArg::Animated(AnimatedScalar::new(progress.clone(), endpoints.0, endpoints.1))
}
