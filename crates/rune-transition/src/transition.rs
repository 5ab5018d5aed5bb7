//! Transition config resolver.
//!
//! Pulls the four reserved directives out of a raw style and resolves them
//! into [`TransitionMetadata`]:
//!
//! - `transitionDelay` / `transitionDuration`: numbers in ms, defaults otherwise
//! - `transitionTimingFunction`: a string, linear otherwise
//! - `transitionProperty`: `"all"` or a comma-separated list, empty otherwise
//!
//! Malformed directives degrade to defaults; nothing here fails.
//!
//! ```
//! use rune_transition::transition::{ResolverDefaults, resolve};
//! use rune_transition::Style;
//! use serde_json::json;
//!
//! let style: Style = serde_json::from_value(json!({
//!     "opacity": 1,
//!     "transitionProperty": "all",
//!     "transitionDuration": 300,
//! })).unwrap();
//!
//! let resolved = resolve(&style, &ResolverDefaults::default());
//! assert_eq!(resolved.metadata.duration_ms, 300.0);
//! assert!(resolved.metadata.properties.contains("transform"));
//! assert!(!resolved.style.contains_key("transitionDuration"));
//! ```

use indexmap::IndexSet;
use rune_config::TransitionDefaults;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::easing::EasingFunction;
use super::transform;
use super::types::{Style, StyleSnapshot, partition_keys};

pub const TRANSITION_DELAY: &str = "transitionDelay";
pub const TRANSITION_DURATION: &str = "transitionDuration";
pub const TRANSITION_PROPERTY: &str = "transitionProperty";
pub const TRANSITION_TIMING_FUNCTION: &str = "transitionTimingFunction";

/// Reserved directive keys, stripped from the output style.
pub const RESERVED_KEYS: [&str; 4] = [
    TRANSITION_DELAY,
    TRANSITION_DURATION,
    TRANSITION_PROPERTY,
    TRANSITION_TIMING_FUNCTION,
];

/// Properties `transitionProperty: "all"` expands to.
pub const ALL_PROPERTIES: [&str; 2] = ["opacity", "transform"];

/// Timing used when a style's delay or duration is not a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverDefaults {
    pub delay_ms: f32,
    pub duration_ms: f32,
}

impl Default for ResolverDefaults {
    fn default() -> Self {
        Self::from(&TransitionDefaults::default())
    }
}

impl From<&TransitionDefaults> for ResolverDefaults {
    fn from(defaults: &TransitionDefaults) -> Self {
        Self {
            delay_ms: defaults.delay_ms.max(0.0),
            duration_ms: defaults.duration_ms.max(0.0),
        }
    }
}

/// Resolved transition directives.
///
/// `properties` is always a concrete set; `"all"` never survives resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionMetadata {
    pub delay_ms: f32,
    pub duration_ms: f32,
    /// The raw timing-function string, if one was given.
    pub timing_function: Option<String>,
    pub easing: EasingFunction,
    pub properties: IndexSet<String>,
}

impl Default for TransitionMetadata {
    fn default() -> Self {
        let defaults = ResolverDefaults::default();
        Self {
            delay_ms: defaults.delay_ms,
            duration_ms: defaults.duration_ms,
            timing_function: None,
            easing: EasingFunction::Linear,
            properties: IndexSet::new(),
        }
    }
}

impl TransitionMetadata {
    /// Resolve directives from a style's reserved keys.
    pub fn from_style(style: &Style, defaults: &ResolverDefaults) -> Self {
        let timing_function = style
            .get(TRANSITION_TIMING_FUNCTION)
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            delay_ms: number_or(style.get(TRANSITION_DELAY), defaults.delay_ms),
            duration_ms: number_or(style.get(TRANSITION_DURATION), defaults.duration_ms),
            easing: EasingFunction::parse(timing_function.as_deref()),
            timing_function,
            properties: resolve_properties(style.get(TRANSITION_PROPERTY)),
        }
    }

    pub fn transitions(&self, property: &str) -> bool {
        self.properties.contains(property)
    }
}

fn number_or(value: Option<&Value>, default: f32) -> f32 {
    value
        .and_then(Value::as_f64)
        .map(|ms| ms as f32)
        .filter(|ms| ms.is_finite())
        .unwrap_or(default)
        .max(0.0)
}

/// Expand a `transitionProperty` directive into concrete property names.
pub fn resolve_properties(value: Option<&Value>) -> IndexSet<String> {
    match value {
        Some(Value::String(list)) if list.trim() == "all" => {
            ALL_PROPERTIES.iter().map(|p| p.to_string()).collect()
        }
        Some(Value::String(list)) => list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        _ => IndexSet::new(),
    }
}

/// A style split into directives, the transitionable subset and everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub metadata: TransitionMetadata,
    /// Values of `metadata.properties` that pass the animatable type guard.
    pub transitionable: StyleSnapshot,
    /// The input minus the reserved directive keys, in input order.
    pub style: Style,
}

/// Resolve a raw style.
pub fn resolve(style: &Style, defaults: &ResolverDefaults) -> ResolvedStyle {
    let (directives, style) = partition_keys(style, &RESERVED_KEYS);
    let metadata = TransitionMetadata::from_style(&directives, defaults);
    let transitionable = StyleSnapshot::from_style(&style, &metadata.properties);
    ResolvedStyle {
        metadata,
        transitionable,
        style,
    }
}

/// Whether a run over `properties` may be driven off the per-frame update path.
///
/// True when every property is `opacity`, or `transform` without skew entries.
pub fn native_driver_eligible(properties: &IndexSet<String>, snapshot: &StyleSnapshot) -> bool {
    properties.iter().all(|property| match property.as_str() {
        "opacity" => true,
        "transform" => snapshot
            .get(property)
            .and_then(|value| value.as_transform())
            .is_none_or(|list| !transform::contains_skew(list)),
        _ => false,
    })
}
