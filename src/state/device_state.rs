// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute value store.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::{ApplyMode, reconcile};
use crate::catalog::property;
use crate::profile::CapabilityProfile;

/// Last known attribute values of a device.
///
/// A cleared attribute is stored as `null` and reads as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    values: HashMap<String, Value>,
}

impl DeviceState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Reconciliation ==========

    /// Applies a status payload in the given mode.
    ///
    /// Returns the attributes whose stored value changed.
    pub fn apply(
        &mut self,
        profile: &CapabilityProfile,
        status: &Value,
        mode: ApplyMode,
    ) -> Vec<String> {
        reconcile::apply(self, profile, status, mode)
    }

    /// Replaces the state with a complete status snapshot.
    pub fn set_status(&mut self, profile: &CapabilityProfile, status: &Value) -> Vec<String> {
        self.apply(profile, status, ApplyMode::Full)
    }

    /// Merges a partial status update into the state.
    pub fn update_status(&mut self, profile: &CapabilityProfile, status: &Value) -> Vec<String> {
        self.apply(profile, status, ApplyMode::Partial)
    }

    // ========== Reads ==========

    /// Returns the value of a readable attribute.
    ///
    /// Returns `None` when the attribute is not readable on this profile or
    /// has no known value.
    #[must_use]
    pub fn get_status<'a>(
        &'a self,
        profile: &CapabilityProfile,
        attribute: &str,
    ) -> Option<&'a Value> {
        if attribute != property::ERROR && !profile.is_readable(attribute) {
            return None;
        }
        self.value(attribute)
    }

    /// Returns a readable attribute as a string.
    #[must_use]
    pub fn get_str<'a>(&'a self, profile: &CapabilityProfile, attribute: &str) -> Option<&'a str> {
        self.get_status(profile, attribute).and_then(Value::as_str)
    }

    /// Returns a readable attribute as a float.
    #[must_use]
    pub fn get_f64(&self, profile: &CapabilityProfile, attribute: &str) -> Option<f64> {
        self.get_status(profile, attribute).and_then(Value::as_f64)
    }

    /// Returns a readable attribute as an integer.
    #[must_use]
    pub fn get_i64(&self, profile: &CapabilityProfile, attribute: &str) -> Option<i64> {
        self.get_status(profile, attribute).and_then(Value::as_i64)
    }

    /// Returns a readable attribute as a boolean.
    #[must_use]
    pub fn get_bool(&self, profile: &CapabilityProfile, attribute: &str) -> Option<bool> {
        self.get_status(profile, attribute).and_then(Value::as_bool)
    }

    /// Returns every readable attribute that has a value, sorted by name.
    #[must_use]
    pub fn status_snapshot(&self, profile: &CapabilityProfile) -> BTreeMap<String, Value> {
        self.values
            .keys()
            .filter_map(|attr| {
                self.get_status(profile, attr)
                    .map(|value| (attr.clone(), value.clone()))
            })
            .collect()
    }

    // ========== Raw access ==========

    /// Returns the stored value, ignoring readability.
    pub(crate) fn value(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute).filter(|value| !value.is_null())
    }

    /// Stores a value; `null` clears the attribute. Returns `true` on change.
    pub(crate) fn set(&mut self, attribute: &str, value: Value) -> bool {
        match self.values.get_mut(attribute) {
            Some(current) if *current == value => false,
            Some(current) => {
                *current = value;
                true
            }
            None if value.is_null() => {
                self.values.insert(attribute.to_string(), value);
                false
            }
            None => {
                self.values.insert(attribute.to_string(), value);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::DeviceFamily;
    use serde_json::json;

    fn profile() -> CapabilityProfile {
        let schema = json!({
            "property": {
                "airFlow": {"windStrength": {"type": "enum", "mode": "rw", "value": {"r": ["LOW", "HIGH"], "w": ["LOW", "HIGH"]}}},
                "powerSave": {"powerSaveEnabled": {"type": "boolean", "mode": "rw"}},
                "filterInfo": {"usedTime": {"type": "number", "mode": "w"}}
            },
            "error": ["FILTER_CLOGGED"]
        });
        CapabilityProfile::compile(&DeviceFamily::air_conditioner(), &schema).unwrap()
    }

    #[test]
    fn new_state_is_empty() {
        let state = DeviceState::new();
        let profile = profile();
        let strength = state.get_status(&profile, property::WIND_STRENGTH);
        assert!(strength.is_none());
    }

    #[test]
    fn set_reports_changes() {
        let mut state = DeviceState::new();
        assert!(state.set("a", json!(1)));
        assert!(!state.set("a", json!(1)));
        assert!(state.set("a", Value::Null));
        assert!(state.value("a").is_none());
        assert!(!state.set("b", Value::Null));
    }

    #[test]
    fn reads_are_gated_by_readability() {
        let profile = profile();
        let mut state = DeviceState::new();
        state.set(property::USED_TIME, json!(10));
        state.set(property::PM1, json!(3));
        assert!(state.get_status(&profile, property::USED_TIME).is_none());
        assert!(state.get_status(&profile, property::PM1).is_none());
    }

    #[test]
    fn typed_getters() {
        let profile = profile();
        let mut state = DeviceState::new();
        state.set_status(
            &profile,
            &json!({"airFlow": {"windStrength": "LOW"}, "powerSave": {"powerSaveEnabled": true}}),
        );
        assert_eq!(
            state.get_str(&profile, property::WIND_STRENGTH),
            Some("LOW")
        );
        assert_eq!(
            state.get_bool(&profile, property::POWER_SAVE_ENABLED),
            Some(true)
        );
        assert_eq!(state.get_i64(&profile, property::WIND_STRENGTH), None);
    }

    #[test]
    fn error_is_stored_when_declared() {
        let profile = profile();
        let mut state = DeviceState::new();
        state.update_status(&profile, &json!({"error": "FILTER_CLOGGED"}));
        assert_eq!(
            state.get_status(&profile, property::ERROR),
            Some(&json!("FILTER_CLOGGED"))
        );
    }

    #[test]
    fn snapshot_lists_readable_values() {
        let profile = profile();
        let mut state = DeviceState::new();
        state.set_status(&profile, &json!({"airFlow": {"windStrength": "HIGH"}}));
        let snapshot = state.status_snapshot(&profile);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[property::WIND_STRENGTH], json!("HIGH"));
    }
}
