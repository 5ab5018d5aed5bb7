//! Transition lifecycle controller.
//!
//! The `TransitionController` owns at most one [`AnimationRun`] and drives it
//! through the host's update cycle:
//!
//! - [`update`](TransitionController::update) (render phase): resolve
//!   directives, diff the transitionable subset against the previously applied
//!   one, create or replace the run, and rebuild the merged output.
//! - [`commit`](TransitionController::commit) (effect phase): start the clock
//!   of a newly created run. Gated on the clock's identity, so unrelated
//!   updates never restart it.
//! - [`tick`](TransitionController::tick): advance the clock; natural
//!   completion stops and releases it.
//! - [`teardown`](TransitionController::teardown): stop whatever is running.
//!   Also runs on drop.
//!
//! ```text
//! Idle --update--> Diffing --no change--> Idle | Running (run kept)
//!                          --change, no run--> Running
//!                          --change, run active--> Replacing --> Running
//! Running --clock finished--> Idle
//! ```
//!
//! # Usage
//!
//! ```
//! use rune_transition::{EngineOptions, Style, TransitionController};
//! use serde_json::json;
//!
//! let mut controller = TransitionController::new(EngineOptions::default());
//! let style = |opacity: f64| -> Style {
//!     serde_json::from_value(json!({
//!         "opacity": opacity,
//!         "transitionProperty": "opacity",
//!         "transitionDuration": 100,
//!     }))
//!     .unwrap()
//! };
//!
//! controller.apply(&style(0.0));
//! controller.apply(&style(1.0));
//! assert!(controller.output().is_animated("opacity"));
//!
//! controller.tick(50.0);
//! assert_eq!(controller.output().sample()["opacity"], json!(0.5));
//! ```

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rune_config::RuneConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::clock::{ClockFactory, ClockTiming, ProgressClock, TickClockFactory};
use super::diagnostics::{self, DiagnosticsSink};
use super::diff;
use super::events::{EventQueue, TransitionEvent};
use super::gate::DependencyGate;
use super::interpolate;
use super::output::{OutputStyle, OutputValue};
use super::transition::{self, ResolverDefaults, TransitionMetadata};
use super::types::{AnimationId, Style, StyleSnapshot};

/// Engine-wide settings: resolver defaults and where diagnostics go.
#[derive(Clone)]
pub struct EngineOptions {
    pub defaults: ResolverDefaults,
    pub diagnostics: Rc<dyn DiagnosticsSink>,
}

impl EngineOptions {
    pub fn from_config(config: &RuneConfig) -> Self {
        Self {
            defaults: ResolverDefaults::from(&config.transition),
            diagnostics: diagnostics::sink_for(&config.diagnostics),
        }
    }

    pub fn with_diagnostics(mut self, sink: Rc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = sink;
        self
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_config(&RuneConfig::default())
    }
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Where the controller is in its update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    /// No run active.
    #[default]
    Idle,
    /// Comparing a new style against the applied one.
    Diffing,
    /// A run is active.
    Running,
    /// Stopping the active run in favour of a new one.
    Replacing,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Diffing => "diffing",
            Self::Running => "running",
            Self::Replacing => "replacing",
        })
    }
}

/// One transition from a `from` snapshot to a `to` snapshot, driven by one clock.
///
/// Replaced wholesale, never mutated, when a newer change arrives.
#[derive(Debug)]
pub struct AnimationRun<C> {
    from: StyleSnapshot,
    to: StyleSnapshot,
    metadata: TransitionMetadata,
    clock: C,
    native_driver_eligible: bool,
    changed: Vec<String>,
    /// Output values bound to `clock`, built once when the run is created.
    bound: IndexMap<String, OutputValue>,
    started: bool,
}

impl<C: ProgressClock> AnimationRun<C> {
    pub fn id(&self) -> AnimationId {
        self.clock.id()
    }

    pub fn from(&self) -> &StyleSnapshot {
        &self.from
    }

    pub fn to(&self) -> &StyleSnapshot {
        &self.to
    }

    pub fn metadata(&self) -> &TransitionMetadata {
        &self.metadata
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn native_driver_eligible(&self) -> bool {
        self.native_driver_eligible
    }

    /// Properties whose change created this run.
    pub fn changed_properties(&self) -> &[String] {
        &self.changed
    }

    /// Whether the clock has been started by a commit.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Current eased progress of the clock.
    pub fn progress(&self) -> f32 {
        self.clock.handle().get()
    }

    pub fn timing(&self) -> ClockTiming {
        ClockTiming {
            delay_ms: self.metadata.delay_ms,
            duration_ms: self.metadata.duration_ms,
            easing: self.metadata.easing,
            use_native_driver: self.native_driver_eligible,
        }
    }
}

/// Drives CSS-like transitions for one style target.
pub struct TransitionController<F: ClockFactory = TickClockFactory> {
    options: EngineOptions,
    factory: F,
    state: ControllerState,
    /// Transitionable subset of the last update.
    applied: Option<StyleSnapshot>,
    run: Option<AnimationRun<F::Clock>>,
    clock_gate: DependencyGate<Option<AnimationId>>,
    output: OutputStyle,
    events: EventQueue,
}

impl TransitionController<TickClockFactory> {
    pub fn new(options: EngineOptions) -> Self {
        Self::with_clock_factory(options, TickClockFactory)
    }
}

impl Default for TransitionController<TickClockFactory> {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl<F: ClockFactory> TransitionController<F> {
    pub fn with_clock_factory(options: EngineOptions, factory: F) -> Self {
        Self {
            options,
            factory,
            state: ControllerState::Idle,
            applied: None,
            run: None,
            clock_gate: DependencyGate::new(),
            output: OutputStyle::new(),
            events: EventQueue::new(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn active_run(&self) -> Option<&AnimationRun<F::Clock>> {
        self.run.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Output of the last update.
    pub fn output(&self) -> &OutputStyle {
        &self.output
    }

    /// Transitionable subset of the last update.
    pub fn applied(&self) -> Option<&StyleSnapshot> {
        self.applied.as_ref()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn clock_factory(&self) -> &F {
        &self.factory
    }

    pub fn drain_events(&mut self) -> Vec<TransitionEvent> {
        self.events.drain().collect()
    }

    /// Render phase: resolve, diff, and rebuild the output for `style`.
    ///
    /// The first update establishes the baseline and never animates.
    pub fn update(&mut self, style: &Style) -> &OutputStyle {
        self.complete_if_finished();
        self.set_state(ControllerState::Diffing);

        let resolved = transition::resolve(style, &self.options.defaults);
        let next = resolved.transitionable;
        let changed =
            self.applied.is_some() && diff::has_changed(Some(&next), self.applied.as_ref());

        if changed {
            self.start_run(&next, resolved.metadata);
        }
        self.applied = Some(next);
        self.rebuild_output(&resolved.style);

        let settled = if self.run.is_some() {
            ControllerState::Running
        } else {
            ControllerState::Idle
        };
        self.set_state(settled);
        &self.output
    }

    /// Effect phase: start the active run's clock if it has not been started yet.
    pub fn commit(&mut self) {
        let Self {
            run,
            clock_gate,
            events,
            ..
        } = self;
        let current = run.as_ref().map(AnimationRun::id);

        clock_gate.run_if_changed(&current, |_| {
            let Some(run) = run.as_mut() else {
                return;
            };
            let timing = run.timing();
            run.clock.start(&timing);
            run.started = true;
            debug!(
                run = %run.id(),
                delay_ms = timing.delay_ms,
                duration_ms = timing.duration_ms,
                easing = %timing.easing,
                native_driver = timing.use_native_driver,
                "transition started"
            );
            events.push(TransitionEvent::Started {
                run_id: run.id(),
                properties: run.changed.clone(),
            });
        });
    }

    /// `update` followed by `commit`, for hosts without a separate effect phase.
    pub fn apply(&mut self, style: &Style) -> &OutputStyle {
        self.update(style);
        self.commit();
        &self.output
    }

    /// Advance the active clock by `delta_ms`.
    pub fn tick(&mut self, delta_ms: f32) {
        if let Some(run) = self.run.as_mut().filter(|run| run.started) {
            run.clock.tick(delta_ms);
        }
        self.complete_if_finished();
    }

    /// Stop and release the active clock, if any.
    pub fn teardown(&mut self) {
        if let Some(mut run) = self.run.take() {
            if run.started {
                run.clock.stop();
                self.events.push(TransitionEvent::Cancelled { run_id: run.id() });
            }
            debug!(run = %run.id(), "transition torn down");
        }
        self.output.freeze();
        self.clock_gate.reset();
        self.set_state(ControllerState::Idle);
    }

    fn start_run(&mut self, to: &StyleSnapshot, metadata: TransitionMetadata) {
        let from = if self.run.is_some() {
            self.set_state(ControllerState::Replacing);
            self.output.sample_snapshot(to.keys())
        } else {
            self.applied.clone().unwrap_or_default()
        };

        // The old clock stops before the new one exists.
        let replaced = self.run.take().map(|mut old| {
            if old.started {
                old.clock.stop();
            }
            (old.id(), old.started)
        });

        let changed = diff::changed_properties(to, self.applied.as_ref());
        let native_driver_eligible = transition::native_driver_eligible(&metadata.properties, to);
        let clock = self.factory.create(0.0);
        let handle = clock.handle();
        let bound = interpolate::interpolate_snapshot(
            &from,
            to,
            Some(&handle),
            &*self.options.diagnostics,
        );

        let run = AnimationRun {
            from,
            to: to.clone(),
            metadata,
            clock,
            native_driver_eligible,
            changed,
            bound,
            started: false,
        };

        if let Some((old_id, was_started)) = replaced {
            debug!(run = %old_id, replaced_by = %run.id(), "transition replaced");
            if was_started {
                self.events.push(TransitionEvent::Replaced {
                    run_id: old_id,
                    replaced_by: run.id(),
                });
            }
        }
        debug!(
            run = %run.id(),
            properties = ?run.changed,
            native_driver = run.native_driver_eligible,
            "transition created"
        );
        self.run = Some(run);
    }

    fn complete_if_finished(&mut self) {
        let finished = self
            .run
            .as_ref()
            .is_some_and(|run| run.started && run.clock.is_finished());
        if !finished {
            return;
        }
        let Some(mut run) = self.run.take() else {
            return;
        };

        run.clock.stop();
        self.output.freeze();
        self.events.push(TransitionEvent::Ended { run_id: run.id() });
        debug!(run = %run.id(), "transition completed");
        self.set_state(ControllerState::Idle);
    }

    fn rebuild_output(&mut self, style: &Style) {
        let mut output = OutputStyle::new();
        for (key, value) in style {
            let bound = self.run.as_ref().and_then(|run| run.bound.get(key));
            let value = match bound {
                Some(bound) => bound.clone(),
                None => OutputValue::Static(value.clone()),
            };
            output.insert(key.clone(), value);
        }
        self.output = output;
    }

    fn set_state(&mut self, state: ControllerState) {
        if self.state != state {
            trace!(from = %self.state, to = %state, "controller state");
            self.state = state;
        }
    }
}

impl<F: ClockFactory> Drop for TransitionController<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<F: ClockFactory> fmt::Debug for TransitionController<F>
where
    F::Clock: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionController")
            .field("state", &self.state)
            .field("applied", &self.applied)
            .field("run", &self.run)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}
