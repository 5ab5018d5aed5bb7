//! Property-based invariant tests for the differ and transform checks.
//!
//! Verifies:
//! 1. `same_shape(a, a)` and `values_equal(a, a)` hold for every stack
//! 2. stacks of different length are never the same shape
//! 3. `has_changed(s, s)` is false for every snapshot
//! 4. `has_changed` ignores the iteration order of `prev`
//! 5. easing resolution never panics and pins the endpoints
//! 6. string interpolation returns its endpoints at 0 and 1

use proptest::prelude::*;
use rune_transition::transform::{TransformArg, TransformKind, TransformList, TransformOp};
use rune_transition::{
    AnimatableValue, EasingFunction, Interpolate, StyleSnapshot, has_changed, transform,
};

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_kind() -> impl Strategy<Value = TransformKind> {
    prop::sample::select(
        TransformKind::ALL
            .into_iter()
            .filter(|kind| *kind != TransformKind::Matrix)
            .collect::<Vec<_>>(),
    )
}

fn arb_arg() -> impl Strategy<Value = TransformArg> {
    prop_oneof![
        (-1000.0f64..1000.0).prop_map(TransformArg::Number),
        (-360i32..360).prop_map(|deg| TransformArg::String(format!("{deg}deg"))),
    ]
}

fn arb_op() -> impl Strategy<Value = TransformOp> {
    (arb_kind(), arb_arg()).prop_map(|(kind, arg)| TransformOp::single(kind, arg))
}

fn arb_stack() -> impl Strategy<Value = TransformList> {
    prop::collection::vec(arb_op(), 0..6)
}

fn arb_value() -> impl Strategy<Value = AnimatableValue> {
    prop_oneof![
        (-1000.0f64..1000.0).prop_map(AnimatableValue::Number),
        "[a-z0-9]{0,8}".prop_map(AnimatableValue::String),
        arb_stack().prop_map(AnimatableValue::Transform),
    ]
}

fn arb_entries() -> impl Strategy<Value = Vec<(String, AnimatableValue)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["opacity", "transform", "width", "height", "color"])
                .prop_map(str::to_string),
            arb_value(),
        ),
        0..6,
    )
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Transform stack compatibility
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_shape_is_reflexive(stack in arb_stack()) {
        prop_assert!(transform::same_shape(&stack, &stack));
        prop_assert!(transform::values_equal(&stack, &stack));
    }

    #[test]
    fn length_mismatch_is_never_same_shape(a in arb_stack(), b in arb_stack()) {
        prop_assume!(a.len() != b.len());
        prop_assert!(!transform::same_shape(&a, &b));
        prop_assert!(!transform::same_shape(&b, &a));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Style differ
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unchanged_snapshot_never_changes(entries in arb_entries()) {
        let snapshot: StyleSnapshot = entries.into_iter().collect();
        prop_assert!(!has_changed(Some(&snapshot), Some(&snapshot.clone())));
    }

    #[test]
    fn prev_iteration_order_is_irrelevant(next in arb_entries(), prev in arb_entries()) {
        let next: StyleSnapshot = next.into_iter().collect();
        let prev: StyleSnapshot = prev.into_iter().collect();
        let mut entries: Vec<_> = prev
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        entries.reverse();
        let reversed: StyleSnapshot = entries.into_iter().collect();

        prop_assert_eq!(
            has_changed(Some(&next), Some(&prev)),
            has_changed(Some(&next), Some(&reversed))
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-6. Easing and scalar interpolation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn easing_parse_is_total(raw in ".{0,40}") {
        let easing = EasingFunction::parse(Some(&raw));
        prop_assert!((easing.evaluate(0.0)).abs() < 1e-6);
        prop_assert!((easing.evaluate(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cubic_bezier_with_four_points_parses(
        x1 in 0.0f32..1.0, y1 in -2.0f32..2.0, x2 in 0.0f32..1.0, y2 in -2.0f32..2.0
    ) {
        let raw = format!("cubic-bezier({x1}, {y1}, {x2}, {y2})");
        prop_assert_eq!(
            EasingFunction::parse(Some(&raw)).control_points(),
            Some([x1, y1, x2, y2])
        );
    }

    #[test]
    fn string_interpolation_hits_endpoints(a in -500i32..500, b in -500i32..500) {
        let from = format!("{a}px");
        let to = format!("{b}px");
        prop_assert_eq!(from.interpolate(&to, 0.0), from.clone());
        prop_assert_eq!(from.interpolate(&to, 1.0), to);
    }
}
