// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Location discovery for composite devices.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::ConfigurationError;
use crate::family::{Composition, LocationLayout};

const LOCATION_NAME: &str = "locationName";
const LOCATION: &str = "location";

/// A location of a composite device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    key: String,
    name: String,
}

impl Location {
    pub(crate) fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }

    /// Raw location tag as it appears in schemas and status payloads.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Canonical location name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Per-location slice of a composite schema.
pub(super) struct LocationSchema {
    pub(super) location: Location,
    pub(super) block: Value,
    pub(super) error: Option<Value>,
}

/// Reads the location tag of a status or schema entry.
pub(crate) fn entry_tag(layout: LocationLayout, entry: &Value) -> Option<&str> {
    match layout {
        LocationLayout::Flat => entry.get(LOCATION_NAME),
        LocationLayout::Nested => entry.get(LOCATION).and_then(|loc| loc.get(LOCATION_NAME)),
    }
    .and_then(Value::as_str)
}

/// Splits a composite property block into per-location schemas, in order of
/// first appearance.
pub(super) fn discover(
    composition: &Composition,
    block: &Value,
    block_name: &'static str,
) -> Result<Vec<LocationSchema>, ConfigurationError> {
    match composition.layout {
        LocationLayout::Nested => discover_nested(composition, block, block_name),
        LocationLayout::Flat => discover_flat(composition, block, block_name),
    }
}

fn discover_nested(
    composition: &Composition,
    block: &Value,
    block_name: &'static str,
) -> Result<Vec<LocationSchema>, ConfigurationError> {
    let entries = block
        .as_array()
        .ok_or(ConfigurationError::InvalidPropertyBlock { block: block_name })?;

    let mut found: Vec<LocationSchema> = Vec::new();
    for entry in entries {
        let key = entry_tag(LocationLayout::Nested, entry)
            .ok_or_else(|| ConfigurationError::InvalidLocationEntry(block_name.to_string()))?;
        if found.iter().any(|schema| schema.location.key() == key) {
            trace!(location = key, "Skipping duplicate location entry");
            continue;
        }
        found.push(LocationSchema {
            location: Location::new(key, composition.location_name(key)),
            block: entry.clone(),
            error: entry.get("error").cloned(),
        });
    }
    Ok(found)
}

fn discover_flat(
    composition: &Composition,
    block: &Value,
    block_name: &'static str,
) -> Result<Vec<LocationSchema>, ConfigurationError> {
    if !block.is_object() {
        return Err(ConfigurationError::InvalidPropertyBlock { block: block_name });
    }

    let mut found: Vec<LocationSchema> = Vec::new();
    for resource in composition.partitioned {
        let Some(entries) = block.get(*resource).and_then(Value::as_array) else {
            continue;
        };
        for entry in entries {
            let key = entry_tag(LocationLayout::Flat, entry)
                .ok_or_else(|| ConfigurationError::InvalidLocationEntry((*resource).to_string()))?;
            let index = match found.iter().position(|schema| schema.location.key() == key) {
                Some(index) => index,
                None => {
                    found.push(LocationSchema {
                        location: Location::new(key, composition.location_name(key)),
                        block: Value::Object(Map::new()),
                        error: None,
                    });
                    found.len() - 1
                }
            };
            if let Value::Object(map) = &mut found[index].block {
                map.entry(*resource).or_insert_with(|| entry.clone());
            }
        }
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ResourceSpec;
    use serde_json::json;

    const ZONE: &[ResourceSpec] = &[ResourceSpec::new("zone", "zone", &[("power", "power")])];

    const FLAT: Composition = Composition {
        layout: LocationLayout::Flat,
        resources: ZONE,
        partitioned: &["zone"],
        location_map: &[("LEFT", "left")],
        use_sub_notification: false,
    };

    const NESTED: Composition = Composition {
        layout: LocationLayout::Nested,
        resources: ZONE,
        partitioned: &[],
        location_map: &[],
        use_sub_notification: false,
    };

    #[test]
    fn flat_locations_in_order_of_appearance() {
        let block = json!({"zone": [
            {"locationName": "RIGHT", "power": {"type": "string", "mode": "r"}},
            {"locationName": "LEFT", "power": {"type": "string", "mode": "r"}}
        ]});
        let found = discover(&FLAT, &block, "property").unwrap();
        let names: Vec<_> = found.iter().map(|s| s.location.name()).collect();
        assert_eq!(names, vec!["RIGHT", "left"]);
        assert_eq!(found[1].location.key(), "LEFT");
        assert_eq!(found[1].block["zone"]["locationName"], "LEFT");
    }

    #[test]
    fn flat_entry_without_tag_is_rejected() {
        let block = json!({"zone": [{"power": {}}]});
        assert!(matches!(
            discover(&FLAT, &block, "property"),
            Err(ConfigurationError::InvalidLocationEntry(_))
        ));
    }

    #[test]
    fn nested_requires_array_block() {
        assert!(matches!(
            discover(&NESTED, &json!({}), "property"),
            Err(ConfigurationError::InvalidPropertyBlock { .. })
        ));
    }

    #[test]
    fn nested_entries_carry_their_error_list() {
        let block = json!([
            {"location": {"locationName": "A"}, "zone": {}, "error": ["E1"]},
            {"location": {"locationName": "B"}, "zone": {}}
        ]);
        let found = discover(&NESTED, &block, "property").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].error, Some(json!(["E1"])));
        assert!(found[1].error.is_none());
    }

    #[test]
    fn entry_tag_by_layout() {
        let flat = json!({"locationName": "L"});
        let nested = json!({"location": {"locationName": "N"}});
        assert_eq!(entry_tag(LocationLayout::Flat, &flat), Some("L"));
        assert_eq!(entry_tag(LocationLayout::Nested, &nested), Some("N"));
        assert_eq!(entry_tag(LocationLayout::Nested, &flat), None);
    }
}
