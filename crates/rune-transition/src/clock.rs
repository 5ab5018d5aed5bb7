//! Progress clocks: the time source that drives a transition run.
//!
//! A clock advances its eased progress from 0 to 1 over `duration_ms` after
//! waiting `delay_ms`. Output values never poll the clock directly; they hold a
//! [`ProgressHandle`] and read it whenever the host samples them.
//!
//! The engine only depends on the [`ProgressClock`] / [`ClockFactory`] traits.
//! [`TickClock`] is the host-driven implementation used by default.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::easing::EasingFunction;
use super::types::{AnimationId, AnimationState};

/// Shared view of a clock's eased progress.
///
/// Cloning shares the underlying cell. Output values only read it; the clock
/// that handed it out writes it with [`set`](Self::set). Single-threaded by
/// construction.
#[derive(Clone, Default)]
pub struct ProgressHandle(Rc<Cell<f32>>);

impl ProgressHandle {
    /// New handle not shared with any clock yet.
    pub fn new(initial: f32) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    /// Current eased progress.
    pub fn get(&self) -> f32 {
        self.0.get()
    }

    /// Publish new eased progress to every output bound to this handle.
    ///
    /// Clock-side writer. A custom [`ProgressClock`] calls this as it advances.
    pub fn set(&self, value: f32) {
        self.0.set(value);
    }

    /// Whether two handles observe the same clock.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ProgressHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProgressHandle").field(&self.get()).finish()
    }
}

/// Timing a clock is started with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTiming {
    pub delay_ms: f32,
    pub duration_ms: f32,
    pub easing: EasingFunction,
    /// Hint that the host may run this clock off its per-frame update path.
    pub use_native_driver: bool,
}

/// A time-driven progress source.
pub trait ProgressClock {
    /// Identity of this clock instance.
    fn id(&self) -> AnimationId;

    /// Handle that bound output values read from.
    fn handle(&self) -> ProgressHandle;

    /// Begin waiting out the delay, then advance.
    fn start(&mut self, timing: &ClockTiming);

    /// Stop advancing. The handle keeps its last value.
    fn stop(&mut self);

    /// Advance by `delta_ms` of host time.
    fn tick(&mut self, delta_ms: f32);

    fn state(&self) -> AnimationState;

    fn is_finished(&self) -> bool {
        self.state() == AnimationState::Finished
    }
}

/// Creates clocks for new transition runs.
pub trait ClockFactory {
    type Clock: ProgressClock;

    fn create(&mut self, initial_progress: f32) -> Self::Clock;
}

/// Host-driven clock: progress moves only when [`ProgressClock::tick`] is called.
#[derive(Debug)]
pub struct TickClock {
    id: AnimationId,
    handle: ProgressHandle,
    timing: Option<ClockTiming>,
    elapsed_ms: f32,
    state: AnimationState,
}

impl TickClock {
    pub fn new(initial_progress: f32) -> Self {
        Self {
            id: AnimationId::new(),
            handle: ProgressHandle::new(initial_progress),
            timing: None,
            elapsed_ms: 0.0,
            state: AnimationState::Pending,
        }
    }

    /// Linear progress (before easing), in [0, 1].
    pub fn raw_progress(&self) -> f32 {
        let Some(timing) = self.timing else {
            return 0.0;
        };
        let active_elapsed = (self.elapsed_ms - timing.delay_ms).max(0.0);
        if timing.duration_ms > 0.0 {
            (active_elapsed / timing.duration_ms).clamp(0.0, 1.0)
        } else if self.elapsed_ms >= timing.delay_ms && self.state != AnimationState::Pending {
            1.0
        } else {
            0.0
        }
    }
}

impl ProgressClock for TickClock {
    fn id(&self) -> AnimationId {
        self.id
    }

    fn handle(&self) -> ProgressHandle {
        self.handle.clone()
    }

    fn start(&mut self, timing: &ClockTiming) {
        self.timing = Some(*timing);
        self.elapsed_ms = 0.0;
        self.state = AnimationState::Pending;
        self.handle.set(0.0);
    }

    fn stop(&mut self) {
        if self.state != AnimationState::Finished {
            self.state = AnimationState::Cancelled;
        }
    }

    fn tick(&mut self, delta_ms: f32) {
        let Some(timing) = self.timing else {
            return;
        };
        match self.state {
            AnimationState::Finished | AnimationState::Cancelled => return,
            AnimationState::Pending | AnimationState::Running => {}
        }

        self.elapsed_ms += delta_ms.max(0.0);
        if self.elapsed_ms < timing.delay_ms {
            return;
        }

        self.state = if self.elapsed_ms - timing.delay_ms >= timing.duration_ms {
            AnimationState::Finished
        } else {
            AnimationState::Running
        };
        self.handle.set(timing.easing.evaluate(self.raw_progress()));
    }

    fn state(&self) -> AnimationState {
        self.state
    }
}

/// Default factory producing [`TickClock`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickClockFactory;

impl ClockFactory for TickClockFactory {
    type Clock = TickClock;

    fn create(&mut self, initial_progress: f32) -> TickClock {
        TickClock::new(initial_progress)
    }
}
