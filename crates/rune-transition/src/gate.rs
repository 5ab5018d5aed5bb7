//! Dependency-gated callbacks.
//!
//! A [`DependencyGate`] remembers the dependency value it last fired for and
//! fires again only when that value changes. The controller keys one gate on
//! the active clock's id so a clock is started once per run, not once per
//! update.

/// Fires once per distinct dependency value.
#[derive(Debug, Clone)]
pub struct DependencyGate<D> {
    last: Option<D>,
}

impl<D> Default for DependencyGate<D> {
    fn default() -> Self {
        Self { last: None }
    }
}

impl<D: PartialEq + Clone> DependencyGate<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True (and records `deps`) when `deps` differs from the last recorded value.
    pub fn changed(&mut self, deps: &D) -> bool {
        if self.last.as_ref() == Some(deps) {
            return false;
        }
        self.last = Some(deps.clone());
        true
    }

    /// Run `callback` if `deps` changed. Returns whether it ran.
    pub fn run_if_changed(&mut self, deps: &D, callback: impl FnOnce(&D)) -> bool {
        let changed = self.changed(deps);
        if changed {
            callback(deps);
        }
        changed
    }

    /// Value the gate last fired for.
    pub fn last(&self) -> Option<&D> {
        self.last.as_ref()
    }

    /// Forget the recorded value; the next check always fires.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
