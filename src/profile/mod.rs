// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability profiles compiled from device schemas.
//!
//! A [`CapabilityProfile`] is built once per device from the raw schema the
//! platform publishes at registration time, using the resource mapping
//! table of the device's [`DeviceFamily`]. It is immutable afterwards.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use thinq_lib::catalog::property;
//! use thinq_lib::family::DeviceFamily;
//! use thinq_lib::profile::CapabilityProfile;
//!
//! let schema = json!({
//!     "property": {
//!         "operation": {
//!             "airConOperationMode": {
//!                 "type": "enum",
//!                 "mode": "rw",
//!                 "value": {"r": ["POWER_ON", "POWER_OFF"], "w": ["POWER_ON", "POWER_OFF"]}
//!             }
//!         }
//!     }
//! });
//!
//! let profile = CapabilityProfile::compile(&DeviceFamily::air_conditioner(), &schema)?;
//! assert!(profile.is_writable(property::AIR_CON_OPERATION_MODE));
//! assert!(!profile.is_readable(property::PM1));
//! # Ok::<(), thinq_lib::error::ConfigurationError>(())
//! ```

mod compiler;
pub(crate) mod location;

pub(crate) use compiler::{ResourceCompilation, compile_uniform};
pub use location::Location;

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::property;
use crate::family::{CustomResourceKind, DeviceFamily};
use crate::types::AttributeDescriptor;

/// One entry of a resource mapping table.
///
/// Maps a raw schema resource key onto a canonical resource, and each raw
/// property key of that resource onto a canonical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Raw schema resource key (e.g. `airConJobMode`).
    pub key: &'static str,
    /// Canonical resource identifier.
    pub resource: &'static str,
    /// Raw property key to canonical attribute pairs.
    pub properties: &'static [(&'static str, &'static str)],
}

impl ResourceSpec {
    /// Creates a mapping table entry.
    #[must_use]
    pub const fn new(
        key: &'static str,
        resource: &'static str,
        properties: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            key,
            resource,
            properties,
        }
    }

    /// Returns the raw property key mapped to `attribute`.
    #[must_use]
    pub fn raw_key_of(&self, attribute: &str) -> Option<&'static str> {
        self.properties
            .iter()
            .find(|(_, attr)| *attr == attribute)
            .map(|(raw, _)| *raw)
    }

    /// Returns the canonical attribute mapped from `raw_key`.
    #[must_use]
    pub fn attribute_of(&self, raw_key: &str) -> Option<&'static str> {
        self.properties
            .iter()
            .find(|(raw, _)| *raw == raw_key)
            .map(|(_, attr)| *attr)
    }
}

/// Readable and writable attributes of one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceAttributes {
    /// Attributes that can be read.
    pub readable: Vec<String>,
    /// Attributes that can be written.
    pub writable: Vec<String>,
}

impl ResourceAttributes {
    /// Returns `true` if the resource exposes no attribute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readable.is_empty() && self.writable.is_empty()
    }

    /// Appends the lists of `other`, keeping the existing entries.
    pub(crate) fn extend(&mut self, other: Self) {
        self.readable.extend(other.readable);
        self.writable.extend(other.writable);
    }
}

/// Compiled capability profile of a device or sub-device.
#[derive(Debug, Clone)]
pub struct CapabilityProfile {
    mapping: &'static [ResourceSpec],
    custom_resources: &'static [&'static str],
    custom: CustomResourceKind,
    descriptors: HashMap<String, AttributeDescriptor>,
    resource_attributes: HashMap<&'static str, Option<ResourceAttributes>>,
    properties: Vec<(&'static str, Vec<String>)>,
    registry: HashMap<String, AttributeDescriptor>,
    notification: Option<AttributeDescriptor>,
    error: Option<AttributeDescriptor>,
    sub_profiles: Vec<(Location, CapabilityProfile)>,
}

impl CapabilityProfile {
    /// Compiles a raw schema document for the given device family.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`](crate::error::ConfigurationError) if the
    /// schema lacks the family's property block or the block has a shape the
    /// family cannot compile.
    pub fn compile(
        family: &DeviceFamily,
        schema: &serde_json::Value,
    ) -> Result<Self, crate::error::ConfigurationError> {
        compiler::compile(family, schema)
    }

    /// Returns the resource mapping table the profile was compiled with.
    #[must_use]
    pub fn mapping_table(&self) -> &'static [ResourceSpec] {
        self.mapping
    }

    /// Returns the custom resource handler of the profile.
    #[must_use]
    pub fn custom_kind(&self) -> CustomResourceKind {
        self.custom
    }

    /// Returns `true` if the raw resource key is handled by the custom handler.
    #[must_use]
    pub fn is_custom_resource(&self, key: &str) -> bool {
        self.custom_resources.contains(&key)
    }

    /// Returns the descriptor of an attribute.
    ///
    /// Covers every attribute of the mapping table (including those whose
    /// resource is absent from the schema) plus the synthetic `notification`
    /// and `error` attributes.
    #[must_use]
    pub fn descriptor(&self, attribute: &str) -> Option<&AttributeDescriptor> {
        match attribute {
            property::NOTIFICATION => self.notification.as_ref(),
            property::ERROR => self.error.as_ref(),
            _ => self.descriptors.get(attribute),
        }
    }

    /// Returns the attribute registry: every attribute exposed by an existing
    /// resource, plus `notification` and `error` when declared.
    #[must_use]
    pub fn registry(&self) -> &HashMap<String, AttributeDescriptor> {
        &self.registry
    }

    /// Returns `true` if the attribute is readable.
    #[must_use]
    pub fn is_readable(&self, attribute: &str) -> bool {
        self.descriptor(attribute)
            .is_some_and(AttributeDescriptor::is_readable)
    }

    /// Returns `true` if the attribute accepts writes.
    ///
    /// Custom handlers may accept writes to attributes whose descriptor is
    /// read-only, as long as the attribute exists on the device.
    #[must_use]
    pub fn is_writable(&self, attribute: &str) -> bool {
        self.descriptor(attribute).is_some_and(|desc| {
            desc.is_writable() || (desc.is_readable() && self.custom.accepts_write(attribute))
        })
    }

    /// Returns the attributes of each existing resource, keyed by canonical
    /// resource identifier.
    #[must_use]
    pub fn properties(&self) -> &[(&'static str, Vec<String>)] {
        &self.properties
    }

    /// Returns the readable and writable attributes of a resource.
    ///
    /// The outer `Option` is `None` for resources outside the mapping table;
    /// the inner one is `None` when the resource is absent from the schema.
    #[must_use]
    pub fn resource_attributes(&self, resource: &str) -> Option<Option<&ResourceAttributes>> {
        self.resource_attributes.get(resource).map(Option::as_ref)
    }

    /// Returns every writable attribute of the profile.
    #[must_use]
    pub fn writable_attributes(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter_map(|(resource, _)| self.resource_attributes.get(resource))
            .flatten()
            .flat_map(|attrs| attrs.writable.iter().map(String::as_str))
            .collect()
    }

    /// Returns the push notification descriptor, if declared.
    #[must_use]
    pub fn notification(&self) -> Option<&AttributeDescriptor> {
        self.notification.as_ref()
    }

    /// Returns the device error descriptor, if declared.
    #[must_use]
    pub fn error(&self) -> Option<&AttributeDescriptor> {
        self.error.as_ref()
    }

    /// Returns the locations discovered in the schema.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.sub_profiles.iter().map(|(location, _)| location)
    }

    /// Returns the profile of the sub-device at `location_name`.
    #[must_use]
    pub fn sub_profile(&self, location_name: &str) -> Option<&CapabilityProfile> {
        self.sub_profiles
            .iter()
            .find(|(location, _)| location.name() == location_name)
            .map(|(_, profile)| profile)
    }

    /// Returns the raw location tag of the sub-device at `location_name`.
    #[must_use]
    pub fn location_key(&self, location_name: &str) -> Option<&str> {
        self.locations()
            .find(|location| location.name() == location_name)
            .map(Location::key)
    }

    /// Returns the raw resource key and payload key a write to `attribute`
    /// must target.
    pub(crate) fn payload_target(&self, attribute: &str) -> Option<(&'static str, &'static str)> {
        self.mapping.iter().find_map(|spec| {
            let raw_key = spec.raw_key_of(attribute)?;
            Some((
                spec.key,
                self.custom.payload_key(attribute).unwrap_or(raw_key),
            ))
        })
    }

    pub(crate) fn sub_profiles(&self) -> &[(Location, CapabilityProfile)] {
        &self.sub_profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: ResourceSpec = ResourceSpec::new(
        "airFlow",
        "air_flow",
        &[("windStrength", "wind_strength"), ("windStep", "wind_step")],
    );

    #[test]
    fn resource_spec_lookups() {
        assert_eq!(SPEC.raw_key_of("wind_step"), Some("windStep"));
        assert_eq!(SPEC.attribute_of("windStrength"), Some("wind_strength"));
        assert_eq!(SPEC.raw_key_of("odor"), None);
    }

    #[test]
    fn resource_attributes_extend_keeps_existing() {
        let mut attrs = ResourceAttributes {
            readable: vec!["a".to_string()],
            writable: vec![],
        };
        attrs.extend(ResourceAttributes {
            readable: vec!["b".to_string()],
            writable: vec!["b".to_string()],
        });
        assert_eq!(attrs.readable, vec!["a", "b"]);
        assert_eq!(attrs.writable, vec!["b"]);
        assert!(!attrs.is_empty());
    }
}
