//! Non-fatal diagnostics raised while building interpolations.
//!
//! Diagnostics are advisory: they never abort an update. Where they go is
//! decided by the injected [`DiagnosticsSink`].

use std::cell::RefCell;
use std::rc::Rc;

use rune_config::DiagnosticsConfig;
use thiserror::Error;

/// A property could not be animated and was emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("transform count/type mismatch on `{property}`, transition skipped for this property")]
    TransformMismatch { property: String },

    #[error("matrix transforms on `{property}` are not animatable, transition skipped")]
    MatrixNotAnimatable { property: String },
}

impl Diagnostic {
    pub fn property(&self) -> &str {
        match self {
            Self::TransformMismatch { property } | Self::MatrixNotAnimatable { property } => {
                property
            }
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticsSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Logs each diagnostic with `tracing::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(property = diagnostic.property(), "{diagnostic}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticsSink for NoopSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Records diagnostics in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    collected: Rc<RefCell<Vec<Diagnostic>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collected.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.collected.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collected.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.collected.borrow_mut().clear();
    }
}

impl DiagnosticsSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.collected.borrow_mut().push(diagnostic);
    }
}

/// Sink for the configured mode: tracing when enabled, no-op otherwise.
pub fn sink_for(config: &DiagnosticsConfig) -> Rc<dyn DiagnosticsSink> {
    if config.is_enabled() {
        Rc::new(TracingSink)
    } else {
        Rc::new(NoopSink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_shares_buffer() {
        let sink = CollectingSink::new();
        let clone = sink.clone();
        clone.report(Diagnostic::MatrixNotAnimatable {
            property: "transform".into(),
        });

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.diagnostics()[0].property(), "transform");

        sink.clear();
        assert!(clone.is_empty());
    }

    #[test]
    fn test_diagnostic_messages() {
        let mismatch = Diagnostic::TransformMismatch {
            property: "transform".into(),
        };
        assert!(mismatch.to_string().contains("count/type mismatch"));

        let matrix = Diagnostic::MatrixNotAnimatable {
            property: "transform".into(),
        };
        assert!(matrix.to_string().contains("matrix"));
    }

    #[test]
    fn test_noop_sink_accepts_reports() {
        NoopSink.report(Diagnostic::TransformMismatch {
            property: "transform".into(),
        });
    }
}
