//! Transform stacks and their structural compatibility.
//!
//! A transform stack is an ordered list of entries, each naming one geometric
//! operation (`{"rotate": "45deg"}`, `{"scaleX": 2}`, ...). Two stacks can only be
//! interpolated when they line up entry by entry:
//!
//! - [`same_shape`]: equal length, and every kind present in `a[i]` is present in `b[i]`
//! - [`values_equal`]: same shape, same kinds, and literally equal magnitudes
//!
//! Neither check compares magnitudes across kinds or normalises units.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::types::{Scalar, number_to_json};

/// Transform operation kinds, declared in their fixed priority order.
///
/// The derived `Ord` is that priority order; when an entry carries more than
/// one kind, the first one wins during decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransformKind {
    Perspective,
    Rotate,
    RotateX,
    RotateY,
    RotateZ,
    Scale,
    ScaleX,
    ScaleY,
    ScaleZ,
    SkewX,
    SkewY,
    TranslateX,
    TranslateY,
    Matrix,
}

impl TransformKind {
    /// Every kind, in priority order.
    pub const ALL: [TransformKind; 14] = [
        Self::Perspective,
        Self::Rotate,
        Self::RotateX,
        Self::RotateY,
        Self::RotateZ,
        Self::Scale,
        Self::ScaleX,
        Self::ScaleY,
        Self::ScaleZ,
        Self::SkewX,
        Self::SkewY,
        Self::TranslateX,
        Self::TranslateY,
        Self::Matrix,
    ];

    /// Style key for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Perspective => "perspective",
            Self::Rotate => "rotate",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
            Self::Scale => "scale",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::ScaleZ => "scaleZ",
            Self::SkewX => "skewX",
            Self::SkewY => "skewY",
            Self::TranslateX => "translateX",
            Self::TranslateY => "translateY",
            Self::Matrix => "matrix",
        }
    }

    /// Kind for a style key; case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Kinds whose magnitude is a plain number (coerced before interpolation).
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Perspective | Self::Scale | Self::ScaleX | Self::ScaleY | Self::ScaleZ
        )
    }

    /// `skewX` or `skewY`.
    pub fn is_skew(self) -> bool {
        matches!(self, Self::SkewX | Self::SkewY)
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The magnitude carried by one transform kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformArg {
    Number(f64),
    String(String),
    /// Anything else, including every `matrix` payload. Never interpolated.
    Opaque(Value),
}

impl TransformArg {
    fn from_json(kind: TransformKind, value: &Value) -> Option<Self> {
        if kind == TransformKind::Matrix {
            return (!value.is_null()).then(|| Self::Opaque(value.clone()));
        }
        match value {
            Value::Null => None,
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::String(s.clone())),
            other => Some(Self::Opaque(other.clone())),
        }
    }

    /// JSON form of the magnitude.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => Value::String(s.clone()),
            Self::Opaque(v) => v.clone(),
        }
    }

    /// Scalar view; `None` for opaque payloads.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Number(n) => Some(Scalar::Number(*n)),
            Self::String(s) => Some(Scalar::String(s.clone())),
            Self::Opaque(_) => None,
        }
    }
}

impl From<Scalar> for TransformArg {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Number(n) => Self::Number(n),
            Scalar::String(s) => Self::String(s),
        }
    }
}

/// One entry of a transform stack.
///
/// Normally holds exactly one kind; nothing prevents more.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOp {
    args: BTreeMap<TransformKind, TransformArg>,
}

impl TransformOp {
    /// Entry with no kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-kind entry.
    pub fn single(kind: TransformKind, arg: TransformArg) -> Self {
        Self::new().with(kind, arg)
    }

    /// Add or replace the magnitude for `kind`.
    pub fn with(mut self, kind: TransformKind, arg: TransformArg) -> Self {
        self.args.insert(kind, arg);
        self
    }

    /// Magnitude for `kind`, if present.
    pub fn get(&self, kind: TransformKind) -> Option<&TransformArg> {
        self.args.get(&kind)
    }

    /// Whether `kind` is present.
    pub fn contains(&self, kind: TransformKind) -> bool {
        self.args.contains_key(&kind)
    }

    /// Present kinds in priority order.
    pub fn kinds(&self) -> impl Iterator<Item = TransformKind> + '_ {
        self.args.keys().copied()
    }

    /// The first non-matrix kind present, in priority order.
    pub fn primary(&self) -> Option<(TransformKind, &TransformArg)> {
        self.args
            .iter()
            .find(|(kind, _)| **kind != TransformKind::Matrix)
            .map(|(kind, arg)| (*kind, arg))
    }

    /// Whether no recognized kind is present.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Parse a JSON object entry. Unknown keys and `null` magnitudes are ignored.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut op = Self::new();
        for (key, raw) in object {
            let Some(kind) = TransformKind::from_name(key) else {
                continue;
            };
            if let Some(arg) = TransformArg::from_json(kind, raw) {
                op.args.insert(kind, arg);
            }
        }
        Some(op)
    }

    /// JSON object keyed by kind name.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (kind, arg) in &self.args {
            object.insert(kind.name().to_string(), arg.to_json());
        }
        Value::Object(object)
    }
}

/// An ordered transform stack.
pub type TransformList = Vec<TransformOp>;

/// Parse a JSON array of entry objects. Any non-object element disqualifies the array.
pub fn list_from_json(value: &Value) -> Option<TransformList> {
    value.as_array()?.iter().map(TransformOp::from_json).collect()
}

/// JSON array form of a stack.
pub fn list_to_json(list: &[TransformOp]) -> Value {
    Value::Array(list.iter().map(TransformOp::to_json).collect())
}

/// Structural compatibility: same length, and per index every kind present in
/// `a[i]` is also present in `b[i]`. Magnitudes are not compared.
pub fn same_shape(a: &[TransformOp], b: &[TransformOp]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(left, right)| left.kinds().all(|kind| right.contains(kind)))
}

/// Literal equality: same shape, identical kind sets, and equal magnitudes per kind.
pub fn values_equal(a: &[TransformOp], b: &[TransformOp]) -> bool {
    same_shape(a, b) && a.iter().zip(b).all(|(left, right)| left == right)
}

pub fn contains_skew(list: &[TransformOp]) -> bool {
    list.iter().any(|op| op.kinds().any(TransformKind::is_skew))
}

pub fn contains_matrix(list: &[TransformOp]) -> bool {
    list.iter().any(|op| op.contains(TransformKind::Matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(value: Value) -> TransformList {
        list_from_json(&value).expect("valid transform list")
    }

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in TransformKind::ALL {
            assert_eq!(TransformKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TransformKind::from_name("translateZ"), None);
    }

    #[test]
    fn test_priority_order_follows_declaration() {
        assert!(TransformKind::Perspective < TransformKind::Rotate);
        assert!(TransformKind::ScaleZ < TransformKind::SkewX);
        assert!(TransformKind::TranslateY < TransformKind::Matrix);
    }

    #[test]
    fn test_primary_picks_first_kind_in_priority_order() {
        let op = TransformOp::from_json(&json!({ "translateX": 10, "scale": 2 })).unwrap();
        let (kind, arg) = op.primary().unwrap();
        assert_eq!(kind, TransformKind::Scale);
        assert_eq!(arg, &TransformArg::Number(2.0));
    }

    #[test]
    fn test_entry_parsing_ignores_unknown_keys_and_nulls() {
        let op = TransformOp::from_json(&json!({ "rotate": null, "bogus": 1, "scaleY": "3" }))
            .unwrap();
        assert_eq!(op.kinds().collect::<Vec<_>>(), vec![TransformKind::ScaleY]);
    }

    #[test]
    fn test_list_requires_object_entries() {
        assert!(list_from_json(&json!([{ "rotate": "1deg" }, 5])).is_none());
        assert_eq!(list_from_json(&json!([])), Some(Vec::new()));
    }

    #[test]
    fn test_same_shape_length_mismatch() {
        let a = list(json!([{ "rotate": "0deg" }]));
        let b = list(json!([{ "rotate": "90deg" }, { "scale": 2 }]));
        assert!(!same_shape(&a, &b));
        assert!(!same_shape(&b, &a));
    }

    #[test]
    fn test_same_shape_kind_mismatch() {
        let a = list(json!([{ "rotate": "0deg" }, { "scale": 1 }]));
        let b = list(json!([{ "rotate": "0deg" }, { "scaleX": 1 }]));
        assert!(!same_shape(&a, &b));
    }

    #[test]
    fn test_same_shape_ignores_magnitudes() {
        let a = list(json!([{ "translateX": 0 }, { "rotate": "0deg" }]));
        let b = list(json!([{ "translateX": 120 }, { "rotate": "180deg" }]));
        assert!(same_shape(&a, &b));
        assert!(!values_equal(&a, &b));
    }

    #[test]
    fn test_same_shape_is_one_directional() {
        let a = list(json!([{ "scale": 1 }]));
        let b = list(json!([{ "scale": 1, "rotate": "0deg" }]));
        assert!(same_shape(&a, &b));
        assert!(!same_shape(&b, &a));
        // Extra kinds on one side are never equal.
        assert!(!values_equal(&a, &b));
    }

    #[test]
    fn test_values_equal_is_literal() {
        let a = list(json!([{ "scale": 2 }]));
        let b = list(json!([{ "scale": "2" }]));
        assert!(same_shape(&a, &b));
        assert!(!values_equal(&a, &b));
        assert!(values_equal(&a, &a.clone()));
    }

    #[test]
    fn test_skew_and_matrix_detection() {
        let skewed = list(json!([{ "scale": 1 }, { "skewX": "10deg" }]));
        assert!(contains_skew(&skewed));
        assert!(!contains_matrix(&skewed));

        let matrix = list(json!([{ "matrix": [1, 0, 0, 1, 0, 0] }]));
        assert!(contains_matrix(&matrix));
        assert!(!contains_skew(&matrix));
    }

    #[test]
    fn test_json_roundtrip_preserves_entries() {
        let value = json!([{ "perspective": 800 }, { "rotateY": "30deg" }]);
        assert_eq!(list_to_json(&list(value.clone())), value);
    }
}
