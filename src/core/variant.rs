//! Union-typed workflow fields.
//!
//! A few fields in the workflow schema accept more than one wire shape. Each
//! is modelled as an enum (or a struct with private invariants) whose decoder
//! tries the legal shapes in a fixed priority order and whose encoder always
//! emits exactly one canonical shape.

use super::error::WorkflowError;
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// String or integer
// ============================================================================

/// A scalar that is either a string or an integer on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StringOrInt {
    String(String),
    Int(i64),
}

impl StringOrInt {
    /// The string value, or `None` for the integer flavour.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// The integer value, or `None` for the string flavour.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::String(_) => None,
        }
    }
}

impl From<&str> for StringOrInt {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for StringOrInt {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for StringOrInt {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl fmt::Display for StringOrInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Int(i) => write!(f, "{}", i),
        }
    }
}

impl Serialize for StringOrInt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

// Untagged variants are attempted top to bottom: string first, then integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrIntShape {
    String(String),
    Int(i64),
}

impl<'de> Deserialize<'de> for StringOrInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match StringOrIntShape::deserialize(deserializer) {
            Ok(StringOrIntShape::String(s)) => Ok(Self::String(s)),
            Ok(StringOrIntShape::Int(i)) => Ok(Self::Int(i)),
            Err(_) => Err(de::Error::custom(WorkflowError::invalid_shape(
                "string-or-int",
                "a string or an integer",
            ))),
        }
    }
}

// ============================================================================
// Secrets
// ============================================================================

/// Secrets passed to a reusable workflow: everything the caller has, or an
/// explicit mapping of callee secret name to caller expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Secrets {
    Inherit,
    Mapping(IndexMap<String, String>),
}

impl Default for Secrets {
    fn default() -> Self {
        Self::Mapping(IndexMap::new())
    }
}

impl Secrets {
    pub fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }

    /// Build a mapping-flavoured value from `(name, expression)` pairs.
    pub fn mapping<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

const INHERIT: &str = "inherit";

impl Serialize for Secrets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Inherit => serializer.serialize_str(INHERIT),
            Self::Mapping(map) => map.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum InheritKeyword {
    Inherit,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct InheritFlag {
    inherit: bool,
}

// Inherit shapes are tried before the generic mapping.
#[derive(Deserialize)]
#[serde(untagged)]
enum SecretsShape {
    Keyword(InheritKeyword),
    Flag(InheritFlag),
    Mapping(IndexMap<String, String>),
}

impl<'de> Deserialize<'de> for Secrets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match SecretsShape::deserialize(deserializer) {
            Ok(SecretsShape::Keyword(InheritKeyword::Inherit)) => Ok(Self::Inherit),
            Ok(SecretsShape::Flag(flag)) if flag.inherit => Ok(Self::Inherit),
            Ok(SecretsShape::Flag(_)) => Ok(Self::Mapping(IndexMap::new())),
            Ok(SecretsShape::Mapping(map)) => Ok(Self::Mapping(map)),
            Err(_) => Err(de::Error::custom(WorkflowError::invalid_shape(
                "secrets",
                "\"inherit\" or a mapping of strings",
            ))),
        }
    }
}

// ============================================================================
// Matrix
// ============================================================================

/// One explicit matrix combination, as used by `include` and `exclude`.
pub type MatrixCombination = BTreeMap<String, StringOrInt>;

const INCLUDE: &str = "include";
const EXCLUDE: &str = "exclude";

/// A strategy matrix: named dimensions plus the reserved `include` and
/// `exclude` combination lists.
///
/// Dimensions are kept sorted by name so encoding is deterministic. The
/// reserved names can never be registered as a dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matrix {
    dimensions: BTreeMap<String, Vec<StringOrInt>>,
    include: Vec<MatrixCombination>,
    exclude: Vec<MatrixCombination>,
}

impl Matrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a dimension.
    pub fn with_dimension<I, V>(mut self, name: &str, values: I) -> Result<Self, WorkflowError>
    where
        I: IntoIterator<Item = V>,
        V: Into<StringOrInt>,
    {
        if is_reserved(name) {
            return Err(WorkflowError::ReservedDimension {
                name: name.to_string(),
            });
        }
        self.dimensions
            .insert(name.to_string(), values.into_iter().map(Into::into).collect());
        Ok(self)
    }

    pub fn with_include(mut self, combination: MatrixCombination) -> Self {
        self.include.push(combination);
        self
    }

    pub fn with_exclude(mut self, combination: MatrixCombination) -> Self {
        self.exclude.push(combination);
        self
    }

    pub fn dimensions(&self) -> &BTreeMap<String, Vec<StringOrInt>> {
        &self.dimensions
    }

    pub fn include(&self) -> &[MatrixCombination] {
        &self.include
    }

    pub fn exclude(&self) -> &[MatrixCombination] {
        &self.exclude
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.include.is_empty() && self.exclude.is_empty()
    }
}

fn is_reserved(name: &str) -> bool {
    name == INCLUDE || name == EXCLUDE
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut len = self.dimensions.len();
        len += usize::from(!self.include.is_empty());
        len += usize::from(!self.exclude.is_empty());

        let mut map = serializer.serialize_map(Some(len))?;
        for (name, values) in &self.dimensions {
            map.serialize_entry(name, values)?;
        }
        if !self.include.is_empty() {
            map.serialize_entry(INCLUDE, &self.include)?;
        }
        if !self.exclude.is_empty() {
            map.serialize_entry(EXCLUDE, &self.exclude)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // BTreeMap iteration gives the lexicographic key order decoding relies on.
        let raw = BTreeMap::<String, serde_yaml_ng::Value>::deserialize(deserializer).map_err(
            |_| de::Error::custom(WorkflowError::invalid_shape("matrix", "a mapping")),
        )?;

        let mut matrix = Matrix::default();
        for (key, value) in raw {
            match key.as_str() {
                INCLUDE => matrix.include = decode_combinations(INCLUDE, value)?,
                EXCLUDE => matrix.exclude = decode_combinations(EXCLUDE, value)?,
                _ => {
                    let values: Vec<StringOrInt> =
                        serde_yaml_ng::from_value(value).map_err(|_| {
                            de::Error::custom(WorkflowError::invalid_shape(
                                &format!("matrix.{}", key),
                                "a list of strings or integers",
                            ))
                        })?;
                    matrix.dimensions.insert(key, values);
                }
            }
        }
        Ok(matrix)
    }
}

fn decode_combinations<E: de::Error>(
    key: &str,
    value: serde_yaml_ng::Value,
) -> Result<Vec<MatrixCombination>, E> {
    serde_yaml_ng::from_value(value).map_err(|_| {
        E::custom(WorkflowError::invalid_shape(
            &format!("matrix.{}", key),
            "a list of mappings of strings or integers",
        ))
    })
}
