//! Output style: literal values merged with values bound to a progress clock.
//!
//! The host renderer treats an [`OutputStyle`] like a style object whose
//! animated entries are read lazily: [`OutputStyle::sample`] resolves every
//! bound value at the clock's current progress.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::clock::ProgressHandle;
use super::interpolate::Interpolate;
use super::transform::{TransformArg, TransformKind};
use super::types::{AnimatableValue, Scalar, Style, StyleSnapshot};

/// A scalar bound to a clock: maps progress [0, 1] onto `[from, to]`.
#[derive(Debug, Clone)]
pub struct AnimatedScalar {
    progress: ProgressHandle,
    from: Scalar,
    to: Scalar,
}

impl AnimatedScalar {
    pub fn new(progress: ProgressHandle, from: Scalar, to: Scalar) -> Self {
        Self { progress, from, to }
    }

    pub fn from(&self) -> &Scalar {
        &self.from
    }

    pub fn to(&self) -> &Scalar {
        &self.to
    }

    pub fn progress(&self) -> &ProgressHandle {
        &self.progress
    }

    /// Value at the clock's current progress.
    pub fn sample(&self) -> Scalar {
        self.from.interpolate(&self.to, self.progress.get())
    }
}

/// One magnitude inside an output transform entry.
#[derive(Debug, Clone)]
pub enum AnimatedTransformArg {
    Static(TransformArg),
    Animated(AnimatedScalar),
}

impl AnimatedTransformArg {
    pub fn sample(&self) -> Value {
        match self {
            Self::Static(arg) => arg.to_json(),
            Self::Animated(scalar) => scalar.sample().to_json(),
        }
    }

    pub fn as_animated(&self) -> Option<&AnimatedScalar> {
        match self {
            Self::Animated(scalar) => Some(scalar),
            Self::Static(_) => None,
        }
    }
}

/// One entry of an output transform stack: exactly one kind.
#[derive(Debug, Clone)]
pub struct AnimatedTransformOp {
    pub kind: TransformKind,
    pub value: AnimatedTransformArg,
}

/// A property value in the output style.
#[derive(Debug, Clone)]
pub enum OutputValue {
    /// Emitted verbatim.
    Static(Value),
    /// Number or string bound to the active clock.
    Animated(AnimatedScalar),
    /// Transform stack decomposed per entry and bound to the active clock.
    Transform(Vec<AnimatedTransformOp>),
}

impl OutputValue {
    pub fn from_animatable(value: &AnimatableValue) -> Self {
        Self::Static(value.to_json())
    }

    /// Literal value at the current clock progress.
    pub fn sample(&self) -> Value {
        match self {
            Self::Static(value) => value.clone(),
            Self::Animated(scalar) => scalar.sample().to_json(),
            Self::Transform(entries) => Value::Array(
                entries
                    .iter()
                    .map(|entry| {
                        let mut object = Map::new();
                        object.insert(entry.kind.name().to_string(), entry.value.sample());
                        Value::Object(object)
                    })
                    .collect(),
            ),
        }
    }

    /// Whether any part of this value reads from a clock.
    pub fn is_animated(&self) -> bool {
        match self {
            Self::Static(_) => false,
            Self::Animated(_) => true,
            Self::Transform(entries) => entries
                .iter()
                .any(|entry| matches!(entry.value, AnimatedTransformArg::Animated(_))),
        }
    }

    pub fn as_static(&self) -> Option<&Value> {
        match self {
            Self::Static(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_animated(&self) -> Option<&AnimatedScalar> {
        match self {
            Self::Animated(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<&[AnimatedTransformOp]> {
        match self {
            Self::Transform(entries) => Some(entries),
            _ => None,
        }
    }
}

/// The merged style handed back to the host for one update cycle.
///
/// Keys keep the order of the input style (minus transition directives).
#[derive(Debug, Clone, Default)]
pub struct OutputStyle {
    entries: IndexMap<String, OutputValue>,
}

impl OutputStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, property: impl Into<String>, value: OutputValue) {
        self.entries.insert(property.into(), value);
    }

    pub fn get(&self, property: &str) -> Option<&OutputValue> {
        self.entries.get(property)
    }

    pub fn is_animated(&self, property: &str) -> bool {
        self.get(property).is_some_and(OutputValue::is_animated)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replace every bound entry with its literal value at current progress.
    pub fn freeze(&mut self) {
        for value in self.entries.values_mut() {
            if value.is_animated() {
                *value = OutputValue::Static(value.sample());
            }
        }
    }

    /// Resolve every entry to a literal value at current clock progress.
    pub fn sample(&self) -> Style {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), value.sample()))
            .collect()
    }

    /// Currently rendered values of `properties` that pass the type guard.
    pub fn sample_snapshot<'a>(
        &self,
        properties: impl IntoIterator<Item = &'a str>,
    ) -> StyleSnapshot {
        properties
            .into_iter()
            .filter_map(|property| {
                let value = self.get(property)?.sample();
                AnimatableValue::from_json(&value).map(|v| (property.to_string(), v))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_animated_scalar_follows_handle() {
        let handle = ProgressHandle::new(0.0);
        let scalar = AnimatedScalar::new(handle.clone(), Scalar::Number(0.0), Scalar::Number(10.0));
        assert_eq!(scalar.sample(), Scalar::Number(0.0));

        handle.set(0.5);
        assert_eq!(scalar.sample(), Scalar::Number(5.0));
    }

    #[test]
    fn test_transform_output_samples_single_kind_entries() {
        let handle = ProgressHandle::new(0.5);
        let value = OutputValue::Transform(vec![
            AnimatedTransformOp {
                kind: TransformKind::ScaleX,
                value: AnimatedTransformArg::Animated(AnimatedScalar::new(
                    handle,
                    Scalar::Number(1.0),
                    Scalar::Number(2.0),
                )),
            },
            AnimatedTransformOp {
                kind: TransformKind::Rotate,
                value: AnimatedTransformArg::Static(TransformArg::String("10deg".into())),
            },
        ]);

        assert!(value.is_animated());
        assert_eq!(value.sample(), json!([{ "scaleX": 1.5 }, { "rotate": "10deg" }]));
    }

    #[test]
    fn test_output_style_sample_preserves_order() {
        let mut output = OutputStyle::new();
        output.insert("width", OutputValue::Static(json!(10)));
        output.insert(
            "opacity",
            OutputValue::Animated(AnimatedScalar::new(
                ProgressHandle::new(1.0),
                Scalar::Number(0.0),
                Scalar::Number(1.0),
            )),
        );
        output.insert("color", OutputValue::Static(json!("red")));

        let sampled = output.sample();
        assert_eq!(sampled.keys().collect::<Vec<_>>(), vec!["width", "opacity", "color"]);
        assert_eq!(sampled["opacity"], json!(1));
        assert!(output.is_animated("opacity"));
        assert!(!output.is_animated("width"));
        assert!(!output.is_animated("missing"));
    }

    #[test]
    fn test_freeze_detaches_from_clock() {
        let handle = ProgressHandle::new(0.5);
        let mut output = OutputStyle::new();
        output.insert(
            "opacity",
            OutputValue::Animated(AnimatedScalar::new(
                handle.clone(),
                Scalar::Number(0.0),
                Scalar::Number(1.0),
            )),
        );

        output.freeze();
        handle.set(1.0);
        assert!(!output.is_animated("opacity"));
        assert_eq!(output.get("opacity").and_then(OutputValue::as_static), Some(&json!(0.5)));
    }

    #[test]
    fn test_sample_snapshot_skips_non_animatable() {
        let mut output = OutputStyle::new();
        output.insert("opacity", OutputValue::Static(json!(0.4)));
        output.insert("hidden", OutputValue::Static(json!(false)));

        let snapshot = output.sample_snapshot(["opacity", "hidden", "missing"]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("opacity"), Some(&AnimatableValue::Number(0.4)));
    }
}
