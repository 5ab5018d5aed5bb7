//! Core value types shared by the resolver, differ and interpolation engine.
//!
//! - `Style`: the raw, loosely typed style bag handed in by the host
//! - `AnimatableValue`: the three value kinds a transition can act on
//! - `StyleSnapshot`: the transitionable subset of a style
//! - `AnimationId` / `AnimationState`: identity and lifecycle of a clock

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::transform::{self, TransformList};

/// A raw style object: property name to arbitrary JSON value, in insertion order.
pub type Style = IndexMap<String, Value>;

/// Unique identifier for a clock / transition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Generate a new unique animation ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a progress clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Created, or started and still waiting out its delay.
    #[default]
    Pending,
    /// Progress is advancing.
    Running,
    /// Progress reached 1.
    Finished,
    /// Stopped before reaching 1.
    Cancelled,
}

/// A scalar endpoint of an interpolation: numbers and plain strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    String(String),
}

impl Scalar {
    /// JSON form, with integral numbers written as integers.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => Value::String(s.clone()),
        }
    }

    /// Numeric view: numbers as-is, strings parsed the way a numeric coercion would.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Convert an f64 into JSON, keeping integral values integral.
pub(crate) fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// The kinds of value a transition can act on.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatableValue {
    Number(f64),
    String(String),
    Transform(TransformList),
}

/// Discriminant of an [`AnimatableValue`], used for kind comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    String,
    Transform,
}

impl AnimatableValue {
    /// Type guard: accept numbers, strings and transform lists; reject everything else.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Array(_) => transform::list_from_json(value).map(Self::Transform),
            _ => None,
        }
    }

    /// JSON form as it would appear in a style.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => Value::String(s.clone()),
            Self::Transform(list) => transform::list_to_json(list),
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Transform(_) => ValueKind::Transform,
        }
    }

    /// Whether this is a number.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Whether this is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Whether this is a transform stack.
    pub fn is_transform(&self) -> bool {
        matches!(self, Self::Transform(_))
    }

    /// The number, if this is one. Strings are not coerced.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The transform stack, if this is one.
    pub fn as_transform(&self) -> Option<&TransformList> {
        match self {
            Self::Transform(list) => Some(list),
            _ => None,
        }
    }

    /// Scalar view for numbers and strings.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Number(n) => Some(Scalar::Number(*n)),
            Self::String(s) => Some(Scalar::String(s.clone())),
            Self::Transform(_) => None,
        }
    }
}

impl From<f64> for AnimatableValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for AnimatableValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<TransformList> for AnimatableValue {
    fn from(list: TransformList) -> Self {
        Self::Transform(list)
    }
}

/// The transitionable subset of a style: property name to animatable value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSnapshot {
    values: IndexMap<String, AnimatableValue>,
}

impl StyleSnapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the entries of `style` named in `properties` that pass the type guard.
    pub fn from_style<'a>(style: &Style, properties: impl IntoIterator<Item = &'a String>) -> Self {
        let mut snapshot = Self::new();
        for name in properties {
            if let Some(value) = style.get(name).and_then(AnimatableValue::from_json) {
                snapshot.set(name.clone(), value);
            }
        }
        snapshot
    }

    pub fn set(&mut self, property: impl Into<String>, value: AnimatableValue) {
        self.values.insert(property.into(), value);
    }

    pub fn get(&self, property: &str) -> Option<&AnimatableValue> {
        self.values.get(property)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.values.contains_key(property)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnimatableValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, AnimatableValue)> for StyleSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, AnimatableValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Split a style into `(matched, remainder)` by a set of reserved key names.
///
/// Both halves keep the input's insertion order.
pub fn partition_keys(style: &Style, reserved: &[&str]) -> (Style, Style) {
    let mut matched = Style::new();
    let mut remainder = Style::new();
    for (key, value) in style {
        if reserved.contains(&key.as_str()) {
            matched.insert(key.clone(), value.clone());
        } else {
            remainder.insert(key.clone(), value.clone());
        }
    }
    (matched, remainder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_guard_accepts_animatable_kinds() {
        assert_eq!(
            AnimatableValue::from_json(&json!(0.5)),
            Some(AnimatableValue::Number(0.5))
        );
        assert_eq!(
            AnimatableValue::from_json(&json!("10px")),
            Some(AnimatableValue::String("10px".into()))
        );
        let transform = AnimatableValue::from_json(&json!([{ "scale": 2 }])).unwrap();
        assert!(transform.is_transform());
        assert_eq!(transform.as_transform().unwrap().len(), 1);
    }

    #[test]
    fn test_type_guard_rejects_other_kinds() {
        assert_eq!(AnimatableValue::from_json(&json!(true)), None);
        assert_eq!(AnimatableValue::from_json(&json!(null)), None);
        assert_eq!(AnimatableValue::from_json(&json!({ "a": 1 })), None);
        assert_eq!(AnimatableValue::from_json(&json!([1, 2, 3])), None);
    }

    #[test]
    fn test_snapshot_from_style_filters_properties_and_types() {
        let style: Style = serde_json::from_value(json!({
            "opacity": 0.3,
            "width": 100,
            "visible": true,
            "transform": [{ "rotate": "45deg" }]
        }))
        .unwrap();
        let props = vec![
            "opacity".to_string(),
            "visible".to_string(),
            "transform".to_string(),
        ];

        let snapshot = StyleSnapshot::from_style(&style, &props);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains("opacity"));
        assert!(snapshot.contains("transform"));
        assert!(!snapshot.contains("width"));
        assert!(!snapshot.contains("visible"));
    }

    #[test]
    fn test_partition_keys_keeps_order() {
        let style: Style = serde_json::from_value(json!({
            "a": 1,
            "transitionDuration": 300,
            "b": 2,
            "transitionProperty": "all"
        }))
        .unwrap();

        let (matched, rest) = partition_keys(&style, &["transitionDuration", "transitionProperty"]);
        assert_eq!(
            matched.keys().collect::<Vec<_>>(),
            vec!["transitionDuration", "transitionProperty"]
        );
        assert_eq!(rest.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_scalar_numeric_coercion() {
        assert_eq!(Scalar::String(" 2 ".into()).as_number(), Some(2.0));
        assert_eq!(Scalar::String("2px".into()).as_number(), None);
        assert_eq!(Scalar::Number(1.5).as_number(), Some(1.5));
    }

    #[test]
    fn test_number_to_json_keeps_integers() {
        assert_eq!(number_to_json(2.0), json!(2));
        assert_eq!(number_to_json(0.25), json!(0.25));
    }

    #[test]
    fn test_animation_ids_are_unique() {
        let a = AnimationId::new();
        let b = AnimationId::new();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
