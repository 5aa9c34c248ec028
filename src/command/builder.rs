// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validated attribute writes.

use serde_json::Value;
use tracing::debug;

use super::ControlPayload;
use crate::error::CommandError;
use crate::family::LocationLayout;
use crate::profile::CapabilityProfile;
use crate::types::AttributeDescriptor;

/// Validation applied to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// Only writability is checked.
    Plain,
    /// The value must be a number inside the writable range.
    Range,
    /// The value must be one of the writable values.
    Enum,
}

#[derive(Debug, Clone, Copy)]
struct LocationScope<'p> {
    layout: LocationLayout,
    key: &'p str,
    partitioned: &'static [&'static str],
}

/// Builds control payloads for one profile.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'p> {
    profile: &'p CapabilityProfile,
    scope: Option<LocationScope<'p>>,
}

impl<'p> CommandBuilder<'p> {
    /// Creates a builder for a main device profile.
    #[must_use]
    pub fn new(profile: &'p CapabilityProfile) -> Self {
        Self {
            profile,
            scope: None,
        }
    }

    /// Creates a builder whose payloads carry a sub-device location tag.
    #[must_use]
    pub(crate) fn for_location(
        profile: &'p CapabilityProfile,
        layout: LocationLayout,
        key: &'p str,
        partitioned: &'static [&'static str],
    ) -> Self {
        Self {
            profile,
            scope: Some(LocationScope {
                layout,
                key,
                partitioned,
            }),
        }
    }

    /// Writes an attribute without value validation.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the attribute is unknown or not writable.
    pub fn attribute(
        &self,
        attribute: &str,
        value: impl Into<Value>,
    ) -> Result<ControlPayload, CommandError> {
        self.build(WriteKind::Plain, &[(attribute, value.into())])
    }

    /// Writes a range attribute.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ValueOutOfRange`] if the value is not a number
    /// allowed by the writable range.
    pub fn range_attribute(
        &self,
        attribute: &str,
        value: impl Into<Value>,
    ) -> Result<ControlPayload, CommandError> {
        self.build(WriteKind::Range, &[(attribute, value.into())])
    }

    /// Writes an enum attribute.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::ValueNotAllowed`] if the value is not one of
    /// the writable values.
    pub fn enum_attribute(
        &self,
        attribute: &str,
        value: impl Into<Value>,
    ) -> Result<ControlPayload, CommandError> {
        self.build(WriteKind::Enum, &[(attribute, value.into())])
    }

    /// Writes several attributes in one payload without value validation.
    ///
    /// # Errors
    ///
    /// Returns the first [`CommandError`] raised by any attribute.
    pub fn multi_attribute(
        &self,
        attributes: &[(&str, Value)],
    ) -> Result<ControlPayload, CommandError> {
        self.build(WriteKind::Plain, attributes)
    }

    /// Writes several range attributes in one payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`CommandError`] raised by any attribute.
    pub fn multi_range_attribute(
        &self,
        attributes: &[(&str, Value)],
    ) -> Result<ControlPayload, CommandError> {
        self.build(WriteKind::Range, attributes)
    }

    /// Validates every write and merges them into one payload.
    ///
    /// Nothing is built unless every attribute passes.
    ///
    /// # Errors
    ///
    /// Returns the first [`CommandError`] raised by any attribute.
    pub fn build(
        &self,
        kind: WriteKind,
        attributes: &[(&str, Value)],
    ) -> Result<ControlPayload, CommandError> {
        let mut payload = ControlPayload::new();
        for (attribute, value) in attributes {
            let descriptor = self.writable_descriptor(attribute)?;
            check_value(kind, attribute, descriptor, value)?;

            let (resource_key, property_key) = self
                .profile
                .payload_target(attribute)
                .ok_or_else(|| CommandError::UnknownAttribute {
                    attribute: (*attribute).to_string(),
                })?;
            payload.merge(ControlPayload::single(resource_key, property_key, value.clone()));
        }

        if let Some(scope) = self.scope {
            payload.tag_location(scope.layout, scope.key, scope.partitioned);
        }
        debug!(?kind, attributes = attributes.len(), "Built control payload");
        Ok(payload)
    }

    fn writable_descriptor(
        &self,
        attribute: &str,
    ) -> Result<&'p AttributeDescriptor, CommandError> {
        let descriptor = self
            .profile
            .descriptor(attribute)
            .ok_or_else(|| CommandError::UnknownAttribute {
                attribute: attribute.to_string(),
            })?;
        if !self.profile.is_writable(attribute) {
            return Err(CommandError::AttributeNotWritable {
                attribute: attribute.to_string(),
            });
        }
        Ok(descriptor)
    }
}

fn check_value(
    kind: WriteKind,
    attribute: &str,
    descriptor: &AttributeDescriptor,
    value: &Value,
) -> Result<(), CommandError> {
    match kind {
        WriteKind::Plain => Ok(()),
        WriteKind::Range => {
            let allowed = value.as_f64().is_some_and(|number| {
                descriptor
                    .writable_values()
                    .and_then(|domain| domain.as_range())
                    .is_some_and(|range| range.allows(number))
            });
            if allowed {
                Ok(())
            } else {
                Err(CommandError::ValueOutOfRange {
                    attribute: attribute.to_string(),
                    value: value.clone(),
                })
            }
        }
        WriteKind::Enum => {
            let allowed = descriptor
                .writable_values()
                .is_some_and(|domain| domain.contains(value));
            if allowed {
                Ok(())
            } else {
                Err(CommandError::ValueNotAllowed {
                    attribute: attribute.to_string(),
                    value: value.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::property as p;
    use crate::family::DeviceFamily;
    use serde_json::json;

    fn profile() -> CapabilityProfile {
        let schema = json!({"property": {
            "operation": {"airConOperationMode": {
                "type": "enum", "mode": "rw", "value": {"r": ["COOL", "DRY"], "w": ["COOL", "POWER_OFF"]}
            }},
            "airFlow": {
                "windStep": {"type": "range", "mode": "rw", "value": {"w": {"min": 1, "max": 8, "step": 1, "except": [5]}}},
                "windStrength": {"type": "enum", "mode": "r", "value": {"r": ["LOW", "HIGH"]}}
            },
            "timer": {
                "relativeHourToStop": {"type": "range", "mode": "w", "value": {"w": {"min": 0, "max": 12}}},
                "relativeMinuteToStop": {"type": "range", "mode": "w", "value": {"w": {"min": 0, "max": 59}}}
            },
            "temperatureInUnits": [
                {"unit": "C", "targetTemperature": {"type": "range", "mode": "rw", "value": {"w": {"min": 18, "max": 30, "step": 0.5}}}}
            ]
        }});
        CapabilityProfile::compile(&DeviceFamily::air_conditioner(), &schema).unwrap()
    }

    #[test]
    fn enum_write_builds_resource_payload() {
        let profile = profile();
        let payload = CommandBuilder::new(&profile)
            .enum_attribute(p::AIR_CON_OPERATION_MODE, "COOL")
            .unwrap();
        assert_eq!(
            payload.into_value(),
            json!({"operation": {"airConOperationMode": "COOL"}})
        );
    }

    #[test]
    fn enum_write_rejects_read_only_value() {
        let profile = profile();
        let err = CommandBuilder::new(&profile)
            .enum_attribute(p::AIR_CON_OPERATION_MODE, "DRY")
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::ValueNotAllowed {
                attribute: p::AIR_CON_OPERATION_MODE.to_string(),
                value: json!("DRY"),
            }
        );
    }

    #[test]
    fn range_write_checks_bounds_step_and_exclusions() {
        let profile = profile();
        let builder = CommandBuilder::new(&profile);
        assert!(builder.range_attribute(p::WIND_STEP, 3).is_ok());
        assert!(matches!(
            builder.range_attribute(p::WIND_STEP, 5),
            Err(CommandError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            builder.range_attribute(p::WIND_STEP, 9),
            Err(CommandError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            builder.range_attribute(p::WIND_STEP, "3"),
            Err(CommandError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn read_only_and_unknown_attributes_are_rejected() {
        let profile = profile();
        let builder = CommandBuilder::new(&profile);
        assert_eq!(
            builder.attribute(p::WIND_STRENGTH, "LOW").unwrap_err(),
            CommandError::AttributeNotWritable {
                attribute: p::WIND_STRENGTH.to_string(),
            }
        );
        assert_eq!(
            builder.attribute(p::PM1, 1).unwrap_err(),
            CommandError::AttributeNotWritable {
                attribute: p::PM1.to_string(),
            }
        );
        assert_eq!(
            builder.attribute("no_such_attribute", 1).unwrap_err(),
            CommandError::UnknownAttribute {
                attribute: "no_such_attribute".to_string(),
            }
        );
    }

    #[test]
    fn multi_write_merges_fragments() {
        let profile = profile();
        let payload = CommandBuilder::new(&profile)
            .multi_range_attribute(&[
                (p::RELATIVE_HOUR_TO_STOP, json!(2)),
                (p::RELATIVE_MINUTE_TO_STOP, json!(30)),
            ])
            .unwrap();
        assert_eq!(
            payload.into_value(),
            json!({"timer": {"relativeHourToStop": 2, "relativeMinuteToStop": 30}})
        );
    }

    #[test]
    fn multi_write_fails_as_a_whole() {
        let profile = profile();
        let result = CommandBuilder::new(&profile).multi_range_attribute(&[
            (p::RELATIVE_HOUR_TO_STOP, json!(2)),
            (p::RELATIVE_MINUTE_TO_STOP, json!(75)),
        ]);
        assert!(matches!(result, Err(CommandError::ValueOutOfRange { .. })));
    }

    #[test]
    fn unit_suffixed_write_uses_custom_key_and_unit() {
        let profile = profile();
        let payload = CommandBuilder::new(&profile)
            .multi_attribute(&[
                (p::TARGET_TEMPERATURE_C, json!(22.5)),
                (p::TEMPERATURE_UNIT, json!("C")),
            ])
            .unwrap();
        assert_eq!(
            payload.into_value(),
            json!({"temperatureInUnits": {"targetTemperature": 22.5, "unit": "C"}})
        );
    }
}
