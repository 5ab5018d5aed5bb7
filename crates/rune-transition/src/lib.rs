//! CSS-like style transitions for an imperative styling pipeline.
//!
//! A host hands the [`TransitionController`] one style object per update
//! cycle. Styles carry ordinary keys plus up to four transition directives
//! (`transitionDelay`, `transitionDuration`, `transitionProperty`,
//! `transitionTimingFunction`). When a transitionable property changes, the
//! controller starts a clock-driven run and returns an [`OutputStyle`] whose
//! transitioning entries are bound to that clock.
//!
//! # Architecture
//!
//! ```text
//! raw Style
//!   └── transition::resolve      directives + transitionable subset
//!         └── diff::has_changed  against the previously applied subset
//!               └── TransitionController starts / replaces an AnimationRun
//!                     └── interpolate::interpolate_snapshot  clock-bound OutputStyle
//! ```
//!
//! Transform stacks are compared with [`transform::same_shape`] and
//! [`transform::values_equal`]. Clocks come from a [`ClockFactory`];
//! [`TickClock`] is advanced by the host via [`TransitionController::tick`].

pub mod clock;
pub mod controller;
pub mod diagnostics;
pub mod diff;
pub mod easing;
pub mod events;
pub mod gate;
pub mod interpolate;
pub mod output;
pub mod transform;
pub mod transition;
pub mod types;

pub use clock::{
    ClockFactory, ClockTiming, ProgressClock, ProgressHandle, TickClock, TickClockFactory,
};
pub use controller::{AnimationRun, ControllerState, EngineOptions, TransitionController};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticsSink, NoopSink, TracingSink};
pub use diff::has_changed;
pub use easing::EasingFunction;
pub use events::{EventQueue, TransitionEvent};
pub use gate::DependencyGate;
pub use interpolate::Interpolate;
pub use output::{
    AnimatedScalar, AnimatedTransformArg, AnimatedTransformOp, OutputStyle, OutputValue,
};
pub use transform::{TransformArg, TransformKind, TransformList, TransformOp};
pub use transition::{ResolvedStyle, ResolverDefaults, TransitionMetadata};
pub use types::{
    AnimatableValue, AnimationId, AnimationState, Scalar, Style, StyleSnapshot, ValueKind,
};
