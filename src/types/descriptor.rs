// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute descriptors compiled from a capability schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw schema key holding the readable part of a value domain.
const READABLE: &str = "r";
/// Raw schema key holding the writable part of a value domain.
const WRITABLE: &str = "w";

/// Tolerance used when comparing range values.
const EPSILON: f64 = 1e-9;

/// Declared type of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// `true` / `false`.
    Boolean,
    /// Free-form string.
    String,
    /// One of a fixed set of literals.
    Enum,
    /// Number bounded by `min`, `max`, `step`.
    Range,
    /// Subset of a fixed set of literals.
    List,
}

impl ValueType {
    /// Parses the raw schema `type` field.
    ///
    /// Returns `None` for types this library does not model.
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw {
            "boolean" => Some(Self::Boolean),
            "string" => Some(Self::String),
            "enum" => Some(Self::Enum),
            "range" => Some(Self::Range),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    /// Returns the schema spelling of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Enum => "enum",
            Self::Range => "range",
            Self::List => "list",
        }
    }

    /// Returns `true` if descriptors of this type carry a value domain.
    #[must_use]
    pub const fn has_domain(self) -> bool {
        matches!(self, Self::Enum | Self::Range | Self::List)
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric domain of a range attribute.
///
/// Deserializes from the raw schema shape `{"min", "max", "step", "except"}`.
/// An empty spec (no bounds) accepts nothing.
///
/// # Examples
///
/// ```
/// use thinq_lib::types::RangeSpec;
///
/// let spec = RangeSpec::new(16.0, 30.0, 0.5).with_excluded([20.0]);
/// assert!(spec.allows(18.5));
/// assert!(!spec.allows(18.25));
/// assert!(!spec.allows(20.0));
/// assert!(!spec.allows(31.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Increment between allowed values, counted from `min`.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Values inside the bounds that are nevertheless rejected.
    #[serde(default, rename = "except", skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<f64>,
}

fn default_step() -> f64 {
    1.0
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            step: default_step(),
            excluded: Vec::new(),
        }
    }
}

impl RangeSpec {
    /// Creates a range with the given bounds and step.
    #[must_use]
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step,
            excluded: Vec::new(),
        }
    }

    /// Adds values that must be rejected even inside the bounds.
    #[must_use]
    pub fn with_excluded(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.excluded.extend(values);
        self
    }

    /// Returns `true` if the range has no bounds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns `true` if `value` lies within the bounds, on a step boundary,
    /// and outside the exclusion set.
    #[must_use]
    pub fn allows(&self, value: f64) -> bool {
        let (Some(min), Some(max)) = (self.min, self.max) else {
            return false;
        };
        if !(min <= value && value <= max) || self.step <= 0.0 {
            return false;
        }
        let steps = (value - min) / self.step;
        if (steps - steps.round()).abs() > EPSILON {
            return false;
        }
        !self.excluded.iter().any(|e| (e - value).abs() < EPSILON)
    }
}

/// Allowed values of an enum, range or list attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ValueDomain {
    /// Numeric range.
    Range(RangeSpec),
    /// Enumerated literals.
    Values(Vec<Value>),
}

impl ValueDomain {
    /// Returns the empty domain for a type: `{}` for ranges, `[]` otherwise.
    #[must_use]
    pub fn empty(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Range => Self::Range(RangeSpec::default()),
            _ => Self::Values(Vec::new()),
        }
    }

    /// Builds a domain from a raw `value.r` / `value.w` fragment.
    ///
    /// Missing or malformed fragments yield the empty domain.
    #[must_use]
    pub fn from_raw(value_type: ValueType, raw: Option<&Value>) -> Self {
        match (value_type, raw) {
            (ValueType::Range, Some(raw)) => RangeSpec::deserialize(raw)
                .map(Self::Range)
                .unwrap_or_else(|_| Self::empty(value_type)),
            (_, Some(Value::Array(values))) => Self::Values(values.clone()),
            _ => Self::empty(value_type),
        }
    }

    /// Returns `true` if the domain allows nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Range(spec) => spec.is_empty(),
            Self::Values(values) => values.is_empty(),
        }
    }

    /// Returns the range spec, if this is a range domain.
    #[must_use]
    pub fn as_range(&self) -> Option<&RangeSpec> {
        match self {
            Self::Range(spec) => Some(spec),
            Self::Values(_) => None,
        }
    }

    /// Returns the enumerated values, if this is an enum or list domain.
    #[must_use]
    pub fn as_values(&self) -> Option<&[Value]> {
        match self {
            Self::Values(values) => Some(values),
            Self::Range(_) => None,
        }
    }

    /// Returns `true` if `value` is one of the enumerated values.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.as_values()
            .is_some_and(|values| values.contains(value))
    }
}

/// Compiled description of a single canonical attribute.
///
/// Descriptors produced by the uniform schema rule and by custom resource
/// handlers have the same shape. A non-writable descriptor never carries
/// writable values, and only enum, range and list descriptors carry domains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDescriptor {
    #[serde(rename = "type")]
    value_type: Option<ValueType>,
    readable: bool,
    writable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    readable_values: Option<ValueDomain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    writable_values: Option<ValueDomain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
}

impl AttributeDescriptor {
    /// Descriptor for an attribute whose resource is absent from the schema.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            value_type: None,
            readable: false,
            writable: false,
            readable_values: None,
            writable_values: None,
            unit: None,
        }
    }

    /// Read-only string descriptor, used for bare string literals in the schema.
    #[must_use]
    pub const fn read_only_string() -> Self {
        Self {
            value_type: Some(ValueType::String),
            readable: true,
            writable: false,
            readable_values: None,
            writable_values: None,
            unit: None,
        }
    }

    /// Read-only enum descriptor over the given values.
    #[must_use]
    pub fn read_only_enum(values: Vec<Value>) -> Self {
        Self {
            value_type: Some(ValueType::Enum),
            readable: true,
            writable: false,
            readable_values: Some(ValueDomain::Values(values)),
            writable_values: Some(ValueDomain::empty(ValueType::Enum)),
            unit: None,
        }
    }

    /// Compiles the raw property `key` of a resource property bag.
    ///
    /// Readability and writability come from the raw `mode` string. For enum,
    /// range and list types the domains come from `value.r` and `value.w`,
    /// falling back to the empty domain when the matching mode bit is unset.
    #[must_use]
    pub fn from_raw(resource_property: &Value, key: &str) -> Self {
        let raw = match resource_property.get(key) {
            Some(Value::String(_)) => return Self::read_only_string(),
            Some(raw @ Value::Object(_)) => raw,
            _ => return Self::unavailable(),
        };

        let mode = raw.get("mode").and_then(Value::as_str).unwrap_or_default();
        let readable = mode.contains(READABLE);
        let writable = mode.contains(WRITABLE);
        let value_type = raw
            .get("type")
            .and_then(Value::as_str)
            .and_then(ValueType::from_raw);
        let unit = raw
            .get("unit")
            .and_then(Value::as_str)
            .or_else(|| resource_property.get("unit").and_then(Value::as_str))
            .map(str::to_string);

        let (readable_values, writable_values) = match value_type {
            Some(ty) if ty.has_domain() => {
                let domain = |enabled: bool, side: &str| {
                    if enabled {
                        ValueDomain::from_raw(ty, raw.get("value").and_then(|v| v.get(side)))
                    } else {
                        ValueDomain::empty(ty)
                    }
                };
                (
                    Some(domain(readable, READABLE)),
                    Some(domain(writable, WRITABLE)),
                )
            }
            _ => (None, None),
        };

        Self {
            value_type,
            readable,
            writable,
            readable_values,
            writable_values,
            unit,
        }
    }

    /// Returns the declared value type.
    #[must_use]
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    /// Returns `true` if the attribute can be read.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Returns `true` if the attribute can be written.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Returns the readable value domain.
    #[must_use]
    pub fn readable_values(&self) -> Option<&ValueDomain> {
        self.readable_values.as_ref()
    }

    /// Returns the writable value domain.
    #[must_use]
    pub fn writable_values(&self) -> Option<&ValueDomain> {
        self.writable_values.as_ref()
    }

    /// Returns the unit declared for the attribute.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}
