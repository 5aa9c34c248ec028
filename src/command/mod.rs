// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control payload construction.
//!
//! A [`CommandBuilder`] validates attribute writes against a
//! [`CapabilityProfile`](crate::profile::CapabilityProfile) and produces a
//! [`ControlPayload`] shaped like the platform expects:
//!
//! ```json
//! {"<raw resource key>": {"<raw property key>": <value>}}
//! ```
//!
//! # Write forms
//!
//! | Form | Checks |
//! |------|--------|
//! | [`WriteKind::Plain`] | attribute is writable |
//! | [`WriteKind::Range`] | writable, numeric, inside the writable range |
//! | [`WriteKind::Enum`] | writable, one of the writable values |
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use thinq_lib::catalog::property;
//! use thinq_lib::command::CommandBuilder;
//! use thinq_lib::family::DeviceFamily;
//! use thinq_lib::profile::CapabilityProfile;
//!
//! let schema = json!({"property": {"operation": {"airConOperationMode": {
//!     "type": "enum", "mode": "rw", "value": {"r": ["COOL", "DRY"], "w": ["COOL"]}
//! }}}});
//! let profile = CapabilityProfile::compile(&DeviceFamily::air_conditioner(), &schema)?;
//!
//! let builder = CommandBuilder::new(&profile);
//! let payload = builder.enum_attribute(property::AIR_CON_OPERATION_MODE, "COOL")?;
//! assert_eq!(payload.into_value(), json!({"operation": {"airConOperationMode": "COOL"}}));
//!
//! assert!(builder.enum_attribute(property::AIR_CON_OPERATION_MODE, "DRY").is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;

pub use builder::{CommandBuilder, WriteKind};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::family::LocationLayout;

const LOCATION_NAME: &str = "locationName";
const LOCATION: &str = "location";

/// A validated control request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ControlPayload(Map<String, Value>);

impl ControlPayload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a payload writing one property of one resource.
    #[must_use]
    pub fn single(resource_key: &str, property_key: &str, value: Value) -> Self {
        let mut fragment = Map::new();
        fragment.insert(property_key.to_string(), value);
        let mut body = Map::new();
        body.insert(resource_key.to_string(), Value::Object(fragment));
        Self(body)
    }

    /// Merges another payload into this one at property level.
    ///
    /// Properties of the same resource are combined; a later value for the
    /// same property wins.
    pub fn merge(&mut self, other: Self) {
        for (resource, fragment) in other.0 {
            match (self.0.get_mut(&resource), fragment) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    existing.extend(incoming);
                }
                (_, fragment) => {
                    self.0.insert(resource, fragment);
                }
            }
        }
    }

    /// Returns the fragment addressed to a raw resource key.
    #[must_use]
    pub fn resource(&self, resource_key: &str) -> Option<&Map<String, Value>> {
        self.0.get(resource_key).and_then(Value::as_object)
    }

    /// Returns `true` if the payload writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the payload into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Tags the payload with the location of a sub-device.
    ///
    /// A flat layout tags each partitioned resource fragment; a nested
    /// layout adds a top-level `location` object.
    pub(crate) fn tag_location(
        &mut self,
        layout: LocationLayout,
        location_key: &str,
        partitioned: &[&str],
    ) {
        match layout {
            LocationLayout::Flat => {
                for (resource, fragment) in &mut self.0 {
                    if partitioned.contains(&resource.as_str())
                        && let Value::Object(fragment) = fragment
                    {
                        fragment.insert(LOCATION_NAME.to_string(), Value::from(location_key));
                    }
                }
            }
            LocationLayout::Nested => {
                let mut location = Map::new();
                location.insert(LOCATION_NAME.to_string(), Value::from(location_key));
                self.0.insert(LOCATION.to_string(), Value::Object(location));
            }
        }
    }
}

impl From<ControlPayload> for Value {
    fn from(payload: ControlPayload) -> Self {
        payload.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_combines_properties_of_same_resource() {
        let mut payload = ControlPayload::single("timer", "relativeHourToStop", json!(2));
        payload.merge(ControlPayload::single("timer", "relativeMinuteToStop", json!(30)));
        payload.merge(ControlPayload::single("powerSave", "powerSaveEnabled", json!(true)));
        assert_eq!(
            payload.into_value(),
            json!({
                "timer": {"relativeHourToStop": 2, "relativeMinuteToStop": 30},
                "powerSave": {"powerSaveEnabled": true}
            })
        );
    }

    #[test]
    fn flat_location_tag_goes_into_partitioned_fragments() {
        let mut payload = ControlPayload::single("temperature", "targetTemperature", json!(3));
        payload.merge(ControlPayload::single("other", "x", json!(1)));
        payload.tag_location(LocationLayout::Flat, "FRIDGE", &["temperature"]);
        assert_eq!(
            payload.into_value(),
            json!({
                "temperature": {"targetTemperature": 3, "locationName": "FRIDGE"},
                "other": {"x": 1}
            })
        );
    }

    #[test]
    fn nested_location_tag_is_top_level() {
        let mut payload = ControlPayload::single("power", "powerLevel", json!(5));
        payload.tag_location(LocationLayout::Nested, "LEFT_FRONT", &[]);
        assert_eq!(
            payload.into_value(),
            json!({"power": {"powerLevel": 5}, "location": {"locationName": "LEFT_FRONT"}})
        );
    }

    #[test]
    fn serializes_transparently() {
        let payload = ControlPayload::single("display", "light", json!("ON"));
        let text = serde_json::to_string(&payload).unwrap();
        assert_eq!(text, r#"{"display":{"light":"ON"}}"#);
        assert!(!payload.is_empty());
        assert_eq!(payload.resource("display").unwrap()["light"], json!("ON"));
    }
}
