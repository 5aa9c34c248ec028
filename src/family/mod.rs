// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device family configuration.
//!
//! A [`DeviceFamily`] bundles everything the generic layers need to know
//! about one kind of appliance: its resource mapping table, the resources
//! that need a custom handler, which schema block holds the properties and,
//! for composite appliances, how locations are laid out.
//!
//! # Built-in families
//!
//! | Device type | Family | Layout |
//! |-------------|--------|--------|
//! | `DEVICE_AIR_CONDITIONER` | [`DeviceFamily::air_conditioner`] | simple |
//! | `DEVICE_COOKTOP` | [`DeviceFamily::cooktop`] | nested locations |
//! | `DEVICE_REFRIGERATOR` | [`DeviceFamily::refrigerator`] | flat locations |
//!
//! Callers can declare their own families with [`DeviceFamily::new`] and
//! the `with_*` builders.

mod air_conditioner;
mod cooktop;
mod refrigerator;

pub use air_conditioner::{AirConditionerControl, TemperatureUnit};

use serde_json::Value;

use crate::error::ConfigurationError;
use crate::profile::{ResourceCompilation, ResourceSpec, compile_uniform};
use crate::state::{ApplyMode, DeviceState};

/// Schema block holding the property declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyBlock {
    /// `property`
    #[default]
    Property,
    /// `extensionProperty`
    ExtensionProperty,
}

impl PropertyBlock {
    /// Returns the schema key of the block.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Property => "property",
            Self::ExtensionProperty => "extensionProperty",
        }
    }
}

/// How a composite device lays out its per-location data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationLayout {
    /// Partitioned resources are arrays of entries tagged with
    /// `locationName`.
    Flat,
    /// The whole property block is an array of entries tagged with
    /// `location.locationName`.
    Nested,
}

/// Sub-device configuration of a composite family.
#[derive(Debug, Clone, Copy)]
pub struct Composition {
    /// Where the location tags live.
    pub layout: LocationLayout,
    /// Mapping table of each sub-device.
    pub resources: &'static [ResourceSpec],
    /// Resources whose data is split per location (flat layout only).
    pub partitioned: &'static [&'static str],
    /// Raw location tag to canonical name; unmapped tags keep their raw name.
    pub location_map: &'static [(&'static str, &'static str)],
    /// Whether sub-devices expose the push notification attribute.
    pub use_sub_notification: bool,
}

impl Composition {
    /// Returns the canonical name of a raw location tag.
    #[must_use]
    pub fn location_name(&self, key: &str) -> String {
        self.location_map
            .iter()
            .find(|(raw, _)| *raw == key)
            .map_or_else(|| key.to_string(), |(_, name)| (*name).to_string())
    }
}

/// Handler for resources that do not follow the uniform one-object shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomResourceKind {
    /// No custom resources.
    #[default]
    Standard,
    /// Unit-multiplexed temperature resources of air conditioners.
    AirConditioner,
}

impl CustomResourceKind {
    pub(crate) fn compile_resource(
        self,
        ctx: &mut ResourceCompilation<'_>,
        spec: &ResourceSpec,
        raw: &Value,
    ) {
        match self {
            Self::Standard => {
                if raw.is_object() {
                    compile_uniform(ctx, spec, raw);
                }
            }
            Self::AirConditioner => air_conditioner::compile_resource(ctx, spec, raw),
        }
    }

    /// Applies one attribute of a custom resource. Returns `false` when the
    /// standard path must handle it instead.
    pub(crate) fn apply_property(
        self,
        state: &mut DeviceState,
        raw_key: &str,
        attribute: &str,
        fragment: &Value,
        mode: ApplyMode,
    ) -> bool {
        match self {
            Self::Standard => false,
            Self::AirConditioner => {
                air_conditioner::apply_property(state, raw_key, attribute, fragment, mode)
            }
        }
    }

    /// Returns the payload key overriding the raw property key of `attribute`.
    pub(crate) fn payload_key(self, attribute: &str) -> Option<&'static str> {
        match self {
            Self::Standard => None,
            Self::AirConditioner => air_conditioner::payload_key(attribute),
        }
    }

    /// Returns `true` if writes to `attribute` are accepted even though its
    /// descriptor is read-only.
    pub(crate) fn accepts_write(self, attribute: &str) -> bool {
        match self {
            Self::Standard => false,
            Self::AirConditioner => air_conditioner::accepts_write(attribute),
        }
    }
}

/// Static configuration of one kind of appliance.
#[derive(Debug, Clone, Copy)]
pub struct DeviceFamily {
    /// Short family name used in logs.
    pub name: &'static str,
    /// Platform device type served by this family.
    pub device_type: &'static str,
    /// Main-device resource mapping table.
    pub resources: &'static [ResourceSpec],
    /// Raw resource keys handled by [`Self::custom`].
    pub custom_resources: &'static [&'static str],
    /// Custom resource handler.
    pub custom: CustomResourceKind,
    /// Schema block holding the properties.
    pub property_block: PropertyBlock,
    /// Whether the main device exposes the push notification attribute.
    pub use_notification: bool,
    /// Sub-device configuration for composite appliances.
    pub composition: Option<Composition>,
}

impl DeviceFamily {
    /// Creates a simple family with the given mapping table.
    #[must_use]
    pub const fn new(
        name: &'static str,
        device_type: &'static str,
        resources: &'static [ResourceSpec],
    ) -> Self {
        Self {
            name,
            device_type,
            resources,
            custom_resources: &[],
            custom: CustomResourceKind::Standard,
            property_block: PropertyBlock::Property,
            use_notification: true,
            composition: None,
        }
    }

    /// Routes the listed raw resources through a custom handler.
    #[must_use]
    pub const fn with_custom(
        mut self,
        custom: CustomResourceKind,
        resources: &'static [&'static str],
    ) -> Self {
        self.custom = custom;
        self.custom_resources = resources;
        self
    }

    /// Reads properties from the `extensionProperty` block.
    #[must_use]
    pub const fn with_extension_property(mut self) -> Self {
        self.property_block = PropertyBlock::ExtensionProperty;
        self
    }

    /// Disables the push notification attribute on the main device.
    #[must_use]
    pub const fn without_notification(mut self) -> Self {
        self.use_notification = false;
        self
    }

    /// Declares the family as composite.
    #[must_use]
    pub const fn with_composition(mut self, composition: Composition) -> Self {
        self.composition = Some(composition);
        self
    }

    /// Air conditioner family.
    #[must_use]
    pub const fn air_conditioner() -> Self {
        air_conditioner::FAMILY
    }

    /// Cooktop family.
    #[must_use]
    pub const fn cooktop() -> Self {
        cooktop::FAMILY
    }

    /// Refrigerator family.
    #[must_use]
    pub const fn refrigerator() -> Self {
        refrigerator::FAMILY
    }

    /// Resolves the built-in family serving a platform device type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnsupportedDeviceType`] for device types
    /// without a built-in family.
    pub fn for_device_type(device_type: &str) -> Result<Self, ConfigurationError> {
        [
            Self::air_conditioner(),
            Self::cooktop(),
            Self::refrigerator(),
        ]
        .into_iter()
        .find(|family| family.device_type == device_type)
        .ok_or_else(|| ConfigurationError::UnsupportedDeviceType(device_type.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_block_keys() {
        assert_eq!(PropertyBlock::Property.key(), "property");
        assert_eq!(PropertyBlock::ExtensionProperty.key(), "extensionProperty");
    }

    #[test]
    fn resolve_built_in_families() {
        let family = DeviceFamily::for_device_type("DEVICE_AIR_CONDITIONER").unwrap();
        assert_eq!(family.name, "air_conditioner");
        assert!(family.composition.is_none());

        let family = DeviceFamily::for_device_type("DEVICE_COOKTOP").unwrap();
        assert_eq!(
            family.composition.map(|c| c.layout),
            Some(LocationLayout::Nested)
        );

        let family = DeviceFamily::for_device_type("DEVICE_REFRIGERATOR").unwrap();
        assert_eq!(
            family.composition.map(|c| c.layout),
            Some(LocationLayout::Flat)
        );
    }

    #[test]
    fn unknown_device_type_is_rejected() {
        let err = DeviceFamily::for_device_type("DEVICE_WASHER").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnsupportedDeviceType("DEVICE_WASHER".to_string())
        );
    }

    #[test]
    fn location_name_falls_back_to_raw_tag() {
        let composition = cooktop::FAMILY.composition.unwrap();
        assert_eq!(composition.location_name("CENTER_FRONT"), "center_front");
        assert_eq!(composition.location_name("TOP"), "TOP");
    }

    #[test]
    fn builder_methods_update_fields() {
        let family = DeviceFamily::new("x", "DEVICE_X", &[])
            .with_extension_property()
            .without_notification()
            .with_custom(CustomResourceKind::AirConditioner, &["temperatureInUnits"]);
        assert_eq!(family.property_block, PropertyBlock::ExtensionProperty);
        assert!(!family.use_notification);
        assert_eq!(family.custom, CustomResourceKind::AirConditioner);
        assert_eq!(family.custom_resources, &["temperatureInUnits"]);
    }
}
