// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status payload reconciliation.

use serde_json::Value;
use tracing::trace;

use super::{ApplyMode, DeviceState};
use crate::catalog::property;
use crate::profile::{CapabilityProfile, ResourceSpec};

const LOCATION_NAME: &str = "locationName";

pub(super) fn apply(
    state: &mut DeviceState,
    profile: &CapabilityProfile,
    status: &Value,
    mode: ApplyMode,
) -> Vec<String> {
    let Some(payload) = status.as_object() else {
        trace!(?mode, "Ignoring non-object status payload");
        return Vec::new();
    };

    let mut changed = Vec::new();
    if profile.error().is_some()
        && let Some(error) = payload.get(property::ERROR)
        && state.set(property::ERROR, error.clone())
    {
        changed.push(property::ERROR.to_string());
    }

    match mode {
        ApplyMode::Full => {
            for spec in profile.mapping_table() {
                let fragment = payload.get(spec.key);
                apply_resource(state, profile, spec, fragment, mode, &mut changed);
            }
        }
        ApplyMode::Partial => {
            for (key, fragment) in payload {
                let specs = profile.mapping_table().iter();
                for spec in specs.filter(|spec| spec.key == key) {
                    apply_resource(state, profile, spec, Some(fragment), mode, &mut changed);
                }
            }
        }
    }

    trace!(?mode, changed = changed.len(), "Applied status payload");
    changed
}

fn apply_resource(
    state: &mut DeviceState,
    profile: &CapabilityProfile,
    spec: &ResourceSpec,
    fragment: Option<&Value>,
    mode: ApplyMode,
    changed: &mut Vec<String>,
) {
    let fragment = fragment.filter(|fragment| !fragment.is_null());
    let custom = profile.is_custom_resource(spec.key);

    for (raw_key, attribute) in spec.properties {
        // Only readable attributes are ever stored.
        if *raw_key == LOCATION_NAME || !profile.is_readable(attribute) {
            continue;
        }
        let before = state.value(attribute).cloned();

        match fragment {
            None => {
                if mode == ApplyMode::Full {
                    state.set(attribute, Value::Null);
                }
            }
            Some(fragment) => {
                let handled = custom
                    && profile
                        .custom_kind()
                        .apply_property(state, raw_key, attribute, fragment, mode);
                if !handled {
                    match (fragment.get(raw_key), mode) {
                        (Some(value), _) => {
                            state.set(attribute, value.clone());
                        }
                        (None, ApplyMode::Full) => {
                            state.set(attribute, Value::Null);
                        }
                        (None, ApplyMode::Partial) => {}
                    }
                }
            }
        }

        if state.value(attribute) != before.as_ref() {
            changed.push((*attribute).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::property as p;
    use crate::family::DeviceFamily;
    use crate::profile::CapabilityProfile;
    use crate::state::DeviceState;
    use serde_json::{Value, json};

    fn profile() -> CapabilityProfile {
        let schema = json!({"property": {
            "operation": {
                "airConOperationMode": {"type": "enum", "mode": "rw", "value": {"r": ["COOL", "POWER_OFF"], "w": ["COOL", "POWER_OFF"]}},
                "airCleanOperationMode": {"type": "enum", "mode": "r", "value": {"r": ["START", "STOP"]}}
            },
            "airFlow": {"windStrength": {"type": "enum", "mode": "rw", "value": {"r": ["LOW", "HIGH"], "w": ["LOW", "HIGH"]}}},
            "temperatureInUnits": [
                {"unit": "C", "targetTemperature": {"type": "range", "mode": "rw", "value": {"w": {"min": 18, "max": 30}}}},
                {"unit": "F", "targetTemperature": {"type": "range", "mode": "rw", "value": {"w": {"min": 64, "max": 86}}}}
            ]
        }});
        CapabilityProfile::compile(&DeviceFamily::air_conditioner(), &schema).unwrap()
    }

    fn snapshot() -> Value {
        json!({
            "operation": {"airConOperationMode": "COOL", "airCleanOperationMode": "STOP"},
            "airFlow": {"windStrength": "HIGH"},
            "temperatureInUnits": [
                {"unit": "C", "targetTemperature": 24},
                {"unit": "F", "targetTemperature": 75}
            ]
        })
    }

    #[test]
    fn full_apply_is_idempotent() {
        let profile = profile();
        let mut state = DeviceState::new();
        state.set_status(&profile, &snapshot());
        let first = state.clone();
        let changed = state.set_status(&profile, &snapshot());
        assert!(changed.is_empty());
        assert_eq!(state, first);
    }

    #[test]
    fn full_apply_clears_missing_resources() {
        let profile = profile();
        let mut state = DeviceState::new();
        state.set_status(&profile, &snapshot());
        let status = json!({"operation": {"airConOperationMode": "POWER_OFF"}});
        state.set_status(&profile, &status);

        assert_eq!(
            state.get_str(&profile, p::AIR_CON_OPERATION_MODE),
            Some("POWER_OFF")
        );
        for attribute in [
            p::AIR_CLEAN_OPERATION_MODE,
            p::WIND_STRENGTH,
            p::TARGET_TEMPERATURE_C,
        ] {
            assert!(state.get_status(&profile, attribute).is_none());
        }
    }

    #[test]
    fn partial_apply_leaves_other_attributes() {
        let profile = profile();
        let mut state = DeviceState::new();
        state.set_status(&profile, &snapshot());

        let status = json!({"operation": {"airConOperationMode": "POWER_OFF"}});
        let changed = state.update_status(&profile, &status);
        assert_eq!(changed, vec![p::AIR_CON_OPERATION_MODE.to_string()]);
        assert_eq!(
            state.get_str(&profile, p::AIR_CLEAN_OPERATION_MODE),
            Some("STOP")
        );
        assert_eq!(state.get_str(&profile, p::WIND_STRENGTH), Some("HIGH"));
        assert_eq!(state.get_i64(&profile, p::TARGET_TEMPERATURE_F), Some(75));
    }

    #[test]
    fn partial_unit_update_touches_only_present_sibling() {
        let profile = profile();
        let mut state = DeviceState::new();
        state.set_status(&profile, &snapshot());

        let status = json!({"temperatureInUnits": [{"unit": "C", "targetTemperature": 22}]});
        state.update_status(&profile, &status);
        assert_eq!(state.get_i64(&profile, p::TARGET_TEMPERATURE_C), Some(22));
        assert_eq!(state.get_i64(&profile, p::TARGET_TEMPERATURE_F), Some(75));
        assert_eq!(state.get_str(&profile, p::TEMPERATURE_UNIT), Some("C"));
    }

    #[test]
    fn attributes_missing_from_schema_are_not_stored() {
        let profile = profile();
        let mut state = DeviceState::new();
        let status = json!({
            "airQualitySensor": {"PM1": 12, "PM10": 30},
            "powerSave": {"powerSaveEnabled": true}
        });

        let changed = state.set_status(&profile, &status);
        assert!(changed.is_empty());
        assert!(state.value(p::PM1).is_none());
        assert!(state.value(p::POWER_SAVE_ENABLED).is_none());
        assert_eq!(state, DeviceState::new());

        state.update_status(&profile, &status);
        assert!(state.value(p::PM10).is_none());
    }

    #[test]
    fn unknown_resources_are_ignored() {
        let profile = profile();
        let mut state = DeviceState::new();
        let changed = state.update_status(&profile, &json!({"mystery": {"x": 1}}));
        assert!(changed.is_empty());
    }

    #[test]
    fn non_object_payload_is_ignored() {
        let profile = profile();
        let mut state = DeviceState::new();
        state.set_status(&profile, &snapshot());
        state.set_status(&profile, &json!([1, 2, 3]));
        assert_eq!(state.get_str(&profile, p::WIND_STRENGTH), Some("HIGH"));
    }
}
