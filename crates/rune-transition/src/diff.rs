//! Style differ: decides whether the transitionable subset changed.
//!
//! Comparison walks `next`'s keys only. Keys present only in `prev` never
//! count as a change.

use super::transform;
use super::types::{AnimatableValue, StyleSnapshot};

/// Whether `next` differs from `prev` enough to (re)start a transition.
///
/// An absent `next` never changes; an absent `prev` with a present `next` always does.
pub fn has_changed(next: Option<&StyleSnapshot>, prev: Option<&StyleSnapshot>) -> bool {
    match (next, prev) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(next), Some(prev)) => next
            .iter()
            .any(|(key, value)| value_changed(value, prev.get(key))),
    }
}

/// Keys of `next` whose values differ from `prev`, in `next`'s order.
pub fn changed_properties(next: &StyleSnapshot, prev: Option<&StyleSnapshot>) -> Vec<String> {
    next.iter()
        .filter(|(key, value)| value_changed(value, prev.and_then(|p| p.get(key))))
        .map(|(key, _)| key.to_string())
        .collect()
}

fn value_changed(next: &AnimatableValue, prev: Option<&AnimatableValue>) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    match (next, prev) {
        (AnimatableValue::Transform(a), AnimatableValue::Transform(b)) => {
            !transform::values_equal(a, b)
        }
        _ if next.kind() != prev.kind() => true,
        _ => next != prev,
    }
}
