// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema to profile compilation.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace, warn};

use super::location::{self, LocationSchema};
use super::{CapabilityProfile, ResourceAttributes, ResourceSpec};
use crate::catalog::property;
use crate::error::ConfigurationError;
use crate::family::{CustomResourceKind, DeviceFamily, LocationLayout};
use crate::types::AttributeDescriptor;

/// Collects the descriptors and access lists of one resource while it is
/// being compiled.
pub(crate) struct ResourceCompilation<'a> {
    descriptors: &'a mut HashMap<String, AttributeDescriptor>,
    attributes: ResourceAttributes,
}

impl ResourceCompilation<'_> {
    /// Records the descriptor of an attribute and adds it to the resource's
    /// readable and writable lists.
    ///
    /// An unavailable descriptor never replaces an accessible one already
    /// registered by an aliased resource.
    pub(crate) fn register(&mut self, attribute: &str, descriptor: AttributeDescriptor) {
        let accessible = |desc: &AttributeDescriptor| desc.is_readable() || desc.is_writable();
        if !accessible(&descriptor) && self.descriptors.get(attribute).is_some_and(accessible) {
            trace!(attribute, "Keeping descriptor from aliased resource");
            return;
        }
        if descriptor.is_readable() {
            self.attributes.readable.push(attribute.to_string());
        }
        if descriptor.is_writable() {
            self.attributes.writable.push(attribute.to_string());
        }
        self.descriptors.insert(attribute.to_string(), descriptor);
    }
}

/// Compiles every property of a standard resource with the uniform rule.
pub(crate) fn compile_uniform(
    ctx: &mut ResourceCompilation<'_>,
    spec: &ResourceSpec,
    raw: &Value,
) {
    for (raw_key, attribute) in spec.properties {
        ctx.register(attribute, AttributeDescriptor::from_raw(raw, raw_key));
    }
}

/// Inputs for compiling one profile (main or sub-device).
struct ProfileInputs<'a> {
    mapping: &'static [ResourceSpec],
    custom_resources: &'static [&'static str],
    custom: CustomResourceKind,
    block: Option<&'a Value>,
    notification: Option<&'a Value>,
    error: Option<&'a Value>,
}

pub(super) fn compile(
    family: &DeviceFamily,
    schema: &Value,
) -> Result<CapabilityProfile, ConfigurationError> {
    let block_name = family.property_block.key();
    let Some(block) = schema.get(block_name).filter(|block| !block.is_null()) else {
        warn!(
            family = family.name,
            block = block_name,
            "Schema has no property block"
        );
        return Err(ConfigurationError::MissingPropertyBlock { block: block_name });
    };

    let notification = family
        .use_notification
        .then(|| schema.pointer("/notification/push"))
        .flatten();
    let top_error = schema.get(property::ERROR);

    let Some(composition) = family.composition else {
        if !block.is_object() {
            return Err(ConfigurationError::InvalidPropertyBlock { block: block_name });
        }
        return Ok(compile_profile(&ProfileInputs {
            mapping: family.resources,
            custom_resources: family.custom_resources,
            custom: family.custom,
            block: Some(block),
            notification,
            error: top_error,
        }));
    };

    let locations = location::discover(&composition, block, block_name)?;
    let sub_notification = composition
        .use_sub_notification
        .then(|| schema.pointer("/notification/push"))
        .flatten();

    let sub_profiles = locations
        .into_iter()
        .map(|LocationSchema { location, block, error }| {
            let profile = compile_profile(&ProfileInputs {
                mapping: composition.resources,
                custom_resources: &[],
                custom: CustomResourceKind::Standard,
                block: Some(&block),
                notification: sub_notification,
                error: error.as_ref(),
            });
            (location, profile)
        })
        .collect::<Vec<_>>();

    // A nested layout only carries per-location entries, so the main profile
    // has no resources of its own.
    let mut profile = match composition.layout {
        LocationLayout::Nested => compile_profile(&ProfileInputs {
            mapping: family.resources,
            custom_resources: family.custom_resources,
            custom: family.custom,
            block: None,
            notification,
            error: None,
        }),
        LocationLayout::Flat => compile_profile(&ProfileInputs {
            mapping: family.resources,
            custom_resources: family.custom_resources,
            custom: family.custom,
            block: Some(block),
            notification,
            error: top_error,
        }),
    };

    debug!(
        family = family.name,
        locations = sub_profiles.len(),
        "Compiled composite profile"
    );
    profile.sub_profiles = sub_profiles;
    Ok(profile)
}

fn compile_profile(inputs: &ProfileInputs<'_>) -> CapabilityProfile {
    let mut descriptors = HashMap::new();
    let mut resource_attributes = HashMap::<&'static str, Option<ResourceAttributes>>::new();
    let mut properties: Vec<(&'static str, Vec<String>)> = Vec::new();

    for spec in inputs.mapping {
        let raw = inputs
            .block
            .and_then(|block| block.get(spec.key))
            .filter(|raw| !raw.is_null());

        let Some(raw) = raw else {
            trace!(resource = spec.key, "Resource absent from schema");
            // An alias compiled earlier keeps its descriptors.
            for (_, attribute) in spec.properties {
                descriptors
                    .entry((*attribute).to_string())
                    .or_insert_with(AttributeDescriptor::unavailable);
            }
            resource_attributes.entry(spec.resource).or_insert(None);
            continue;
        };

        let mut ctx = ResourceCompilation {
            descriptors: &mut descriptors,
            attributes: ResourceAttributes::default(),
        };
        if inputs.custom_resources.contains(&spec.key) {
            inputs.custom.compile_resource(&mut ctx, spec, raw);
        } else if raw.is_object() {
            compile_uniform(&mut ctx, spec, raw);
        }
        let attributes = ctx.attributes;

        for (_, attribute) in spec.properties {
            descriptors
                .entry((*attribute).to_string())
                .or_insert_with(AttributeDescriptor::unavailable);
        }

        let names: Vec<String> = attributes
            .readable
            .iter()
            .chain(&attributes.writable)
            .cloned()
            .collect();
        if !names.is_empty() {
            match properties.iter_mut().find(|(res, _)| *res == spec.resource) {
                Some((_, existing)) => {
                    for name in names {
                        if !existing.contains(&name) {
                            existing.push(name);
                        }
                    }
                }
                None => {
                    let mut unique: Vec<String> = Vec::with_capacity(names.len());
                    for name in names {
                        if !unique.contains(&name) {
                            unique.push(name);
                        }
                    }
                    properties.push((spec.resource, unique));
                }
            }
        }

        match resource_attributes.get_mut(spec.resource) {
            Some(Some(existing)) => existing.extend(attributes),
            _ => {
                resource_attributes.insert(spec.resource, Some(attributes));
            }
        }
    }

    let mut registry: HashMap<String, AttributeDescriptor> = properties
        .iter()
        .flat_map(|(_, attrs)| attrs.iter())
        .filter_map(|attr| descriptors.get(attr).map(|desc| (attr.clone(), desc.clone())))
        .collect();

    let notification = inputs
        .notification
        .and_then(Value::as_array)
        .map(|codes| AttributeDescriptor::read_only_enum(codes.clone()));
    let error = inputs
        .error
        .and_then(Value::as_array)
        .map(|codes| AttributeDescriptor::read_only_enum(codes.clone()));
    if let Some(desc) = &notification {
        registry.insert(property::NOTIFICATION.to_string(), desc.clone());
    }
    if let Some(desc) = &error {
        registry.insert(property::ERROR.to_string(), desc.clone());
    }

    CapabilityProfile {
        mapping: inputs.mapping,
        custom_resources: inputs.custom_resources,
        custom: inputs.custom,
        descriptors,
        resource_attributes,
        properties,
        registry,
        notification,
        error,
        sub_profiles: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resource;
    use crate::types::{ValueDomain, ValueType};
    use serde_json::json;

    const TABLE: &[ResourceSpec] = &[
        ResourceSpec::new(
            "operation",
            "operation",
            &[("airConOperationMode", "air_con_operation_mode")],
        ),
        ResourceSpec::new("display", "display", &[("light", "display_light")]),
        ResourceSpec::new("primary", "shared", &[("a", "attr_a")]),
        ResourceSpec::new("secondary", "shared", &[("a", "attr_a"), ("b", "attr_b")]),
    ];

    const FAMILY: DeviceFamily = DeviceFamily::new("test", "DEVICE_TEST", TABLE);

    #[test]
    fn missing_property_block_is_fatal() {
        let err = CapabilityProfile::compile(&FAMILY, &json!({})).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingPropertyBlock { block: "property" }
        );
    }

    #[test]
    fn extension_property_block_is_used_when_configured() {
        let family = FAMILY.with_extension_property();
        let schema = json!({"extensionProperty": {"display": {"light": {"type": "boolean", "mode": "r"}}}});
        let profile = CapabilityProfile::compile(&family, &schema).unwrap();
        assert!(profile.is_readable("display_light"));

        let err = CapabilityProfile::compile(&family, &json!({"property": {}})).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingPropertyBlock {
                block: "extensionProperty",
            }
        );
    }

    #[test]
    fn array_property_block_is_rejected_for_simple_family() {
        let err = CapabilityProfile::compile(&FAMILY, &json!({"property": []})).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidPropertyBlock { .. }
        ));
    }

    #[test]
    fn absent_resource_is_unavailable() {
        let schema = json!({"property": {"operation": {
            "airConOperationMode": {"type": "enum", "mode": "rw", "value": {"r": ["COOL"], "w": ["COOL"]}}
        }}});
        let profile = CapabilityProfile::compile(&FAMILY, &schema).unwrap();

        let light = profile.descriptor("display_light").unwrap();
        assert!(!light.is_readable());
        assert!(!light.is_writable());
        assert_eq!(light.value_type(), None);
        assert_eq!(profile.resource_attributes(resource::DISPLAY), Some(None));
        assert!(!profile.registry().contains_key("display_light"));
        assert!(profile.registry().contains_key("air_con_operation_mode"));
    }

    #[test]
    fn enum_descriptor_keeps_domains() {
        let schema = json!({"property": {"operation": {
            "airConOperationMode": {
                "type": "enum",
                "mode": "rw",
                "value": {"r": ["COOL", "DRY"], "w": ["COOL"]}
            }
        }}});
        let profile = CapabilityProfile::compile(&FAMILY, &schema).unwrap();
        let desc = profile.descriptor("air_con_operation_mode").unwrap();
        assert_eq!(desc.value_type(), Some(ValueType::Enum));
        assert_eq!(
            desc.writable_values(),
            Some(&ValueDomain::Values(vec![json!("COOL")]))
        );
        assert_eq!(
            profile.writable_attributes(),
            vec!["air_con_operation_mode"]
        );
    }

    #[test]
    fn aliased_resources_merge_lists() {
        let schema = json!({"property": {
            "primary": {"a": {"type": "boolean", "mode": "r"}},
            "secondary": {
                "a": {"type": "boolean", "mode": "r"},
                "b": {"type": "boolean", "mode": "rw"}
            }
        }});
        let profile = CapabilityProfile::compile(&FAMILY, &schema).unwrap();
        let shared = profile.resource_attributes("shared").unwrap().unwrap();
        assert_eq!(shared.readable, vec!["attr_a", "attr_a", "attr_b"]);
        assert_eq!(shared.writable, vec!["attr_b"]);

        let (_, attrs) = profile
            .properties()
            .iter()
            .find(|(res, _)| *res == "shared")
            .unwrap();
        assert_eq!(attrs, &vec!["attr_a".to_string(), "attr_b".to_string()]);
    }

    #[test]
    fn aliased_resource_missing_key_keeps_readable_descriptor() {
        let schema = json!({"property": {
            "primary": {"a": {"type": "boolean", "mode": "r"}},
            "secondary": {"b": {"type": "boolean", "mode": "rw"}}
        }});
        let profile = CapabilityProfile::compile(&FAMILY, &schema).unwrap();
        assert!(profile.is_readable("attr_a"));
        assert!(profile.descriptor("attr_a").unwrap().is_readable());

        let shared = profile.resource_attributes("shared").unwrap().unwrap();
        assert_eq!(shared.readable, vec!["attr_a", "attr_b"]);
        assert_eq!(shared.writable, vec!["attr_b"]);
    }

    #[test]
    fn aliased_resource_absent_keeps_existing_list() {
        let schema = json!({"property": {
            "primary": {"a": {"type": "boolean", "mode": "r"}}
        }});
        let profile = CapabilityProfile::compile(&FAMILY, &schema).unwrap();
        let shared = profile.resource_attributes("shared").unwrap().unwrap();
        assert_eq!(shared.readable, vec!["attr_a"]);
        assert!(!profile.is_readable("attr_b"));
    }

    #[test]
    fn notification_and_error_are_read_only_enums() {
        let schema = json!({
            "property": {},
            "notification": {"push": ["WATER_IS_FULL", "CLEANING_IS_COMPLETED"]},
            "error": ["FILTER_ERROR"]
        });
        let profile = CapabilityProfile::compile(&FAMILY, &schema).unwrap();

        let notification = profile.notification().unwrap();
        assert!(notification.is_readable());
        assert!(!notification.is_writable());
        assert!(
            notification
                .readable_values()
                .unwrap()
                .contains(&json!("WATER_IS_FULL"))
        );
        assert!(profile.registry().contains_key(property::NOTIFICATION));
        assert!(profile.registry().contains_key(property::ERROR));
        assert!(profile.is_readable(property::ERROR));
    }

    #[test]
    fn notification_is_skipped_when_family_opts_out() {
        let family = FAMILY.without_notification();
        let schema = json!({"property": {}, "notification": {"push": ["A"]}});
        let profile = CapabilityProfile::compile(&family, &schema).unwrap();
        assert!(profile.notification().is_none());
        assert!(profile.error().is_none());
    }
}
