// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air conditioner family.
//!
//! Temperatures are published once per unit: `temperatureInUnits` and
//! `twoSetTemperatureInUnits` are arrays of sibling objects, each tagged
//! with a `unit` (`"C"` or `"F"`). Canonical attributes carry the unit as a
//! suffix (`target_temperature_c`) and are resolved against the sibling
//! whose unit matches.

use serde_json::Value;
use tracing::trace;

use super::{CustomResourceKind, DeviceFamily};
use crate::catalog::{property as p, resource as r};
use crate::device::AttributeControl;
use crate::error::Result;
use crate::profile::{ResourceCompilation, ResourceSpec, compile_uniform};
use crate::protocol::ControlResponse;
use crate::state::{ApplyMode, DeviceState};
use crate::types::AttributeDescriptor;

const UNIT: &str = "unit";
const CELSIUS: &str = "C";

const RESOURCES: &[ResourceSpec] = &[
    ResourceSpec::new(
        "airConJobMode",
        r::AIR_CON_JOB_MODE,
        &[("currentJobMode", p::CURRENT_JOB_MODE)],
    ),
    ResourceSpec::new(
        "operation",
        r::OPERATION,
        &[
            ("airConOperationMode", p::AIR_CON_OPERATION_MODE),
            ("airCleanOperationMode", p::AIR_CLEAN_OPERATION_MODE),
        ],
    ),
    ResourceSpec::new(
        "temperatureInUnits",
        r::TEMPERATURE,
        &[
            ("currentTemperatureC", p::CURRENT_TEMPERATURE_C),
            ("currentTemperatureF", p::CURRENT_TEMPERATURE_F),
            ("targetTemperatureC", p::TARGET_TEMPERATURE_C),
            ("targetTemperatureF", p::TARGET_TEMPERATURE_F),
            ("heatTargetTemperatureC", p::HEAT_TARGET_TEMPERATURE_C),
            ("heatTargetTemperatureF", p::HEAT_TARGET_TEMPERATURE_F),
            ("coolTargetTemperatureC", p::COOL_TARGET_TEMPERATURE_C),
            ("coolTargetTemperatureF", p::COOL_TARGET_TEMPERATURE_F),
            (UNIT, p::TEMPERATURE_UNIT),
        ],
    ),
    ResourceSpec::new(
        "twoSetTemperature",
        r::TWO_SET_TEMPERATURE,
        &[("twoSetEnabled", p::TWO_SET_ENABLED)],
    ),
    ResourceSpec::new(
        "twoSetTemperatureInUnits",
        r::TWO_SET_TEMPERATURE,
        &[
            ("heatTargetTemperatureC", p::TWO_SET_HEAT_TARGET_TEMPERATURE_C),
            ("heatTargetTemperatureF", p::TWO_SET_HEAT_TARGET_TEMPERATURE_F),
            ("coolTargetTemperatureC", p::TWO_SET_COOL_TARGET_TEMPERATURE_C),
            ("coolTargetTemperatureF", p::TWO_SET_COOL_TARGET_TEMPERATURE_F),
            (UNIT, p::TWO_SET_TEMPERATURE_UNIT),
        ],
    ),
    ResourceSpec::new(
        "timer",
        r::TIMER,
        &[
            ("relativeHourToStart", p::RELATIVE_HOUR_TO_START),
            ("relativeMinuteToStart", p::RELATIVE_MINUTE_TO_START),
            ("relativeHourToStop", p::RELATIVE_HOUR_TO_STOP),
            ("relativeMinuteToStop", p::RELATIVE_MINUTE_TO_STOP),
            ("absoluteHourToStart", p::ABSOLUTE_HOUR_TO_START),
            ("absoluteMinuteToStart", p::ABSOLUTE_MINUTE_TO_START),
            ("absoluteHourToStop", p::ABSOLUTE_HOUR_TO_STOP),
            ("absoluteMinuteToStop", p::ABSOLUTE_MINUTE_TO_STOP),
        ],
    ),
    ResourceSpec::new(
        "sleepTimer",
        r::SLEEP_TIMER,
        &[
            ("relativeHourToStop", p::SLEEP_TIMER_RELATIVE_HOUR_TO_STOP),
            ("relativeMinuteToStop", p::SLEEP_TIMER_RELATIVE_MINUTE_TO_STOP),
        ],
    ),
    ResourceSpec::new(
        "powerSave",
        r::POWER_SAVE,
        &[("powerSaveEnabled", p::POWER_SAVE_ENABLED)],
    ),
    ResourceSpec::new(
        "airFlow",
        r::AIR_FLOW,
        &[
            ("windStrength", p::WIND_STRENGTH),
            ("windStep", p::WIND_STEP),
        ],
    ),
    ResourceSpec::new(
        "airQualitySensor",
        r::AIR_QUALITY_SENSOR,
        &[
            ("PM1", p::PM1),
            ("PM2", p::PM2),
            ("PM10", p::PM10),
            ("odor", p::ODOR),
            ("odorLevel", p::ODOR_LEVEL),
            ("humidity", p::HUMIDITY),
            ("totalPollution", p::TOTAL_POLLUTION),
            ("totalPollutionLevel", p::TOTAL_POLLUTION_LEVEL),
            ("monitoringEnabled", p::MONITORING_ENABLED),
        ],
    ),
    ResourceSpec::new(
        "filterInfo",
        r::FILTER_INFO,
        &[
            ("usedTime", p::USED_TIME),
            ("filterLifetime", p::FILTER_LIFETIME),
            ("filterRemainPercent", p::FILTER_REMAIN_PERCENT),
        ],
    ),
    ResourceSpec::new("display", r::DISPLAY, &[("light", p::DISPLAY_LIGHT)]),
    ResourceSpec::new(
        "windDirection",
        r::WIND_DIRECTION,
        &[
            ("rotateUpDown", p::WIND_ROTATE_UP_DOWN),
            ("rotateLeftRight", p::WIND_ROTATE_LEFT_RIGHT),
        ],
    ),
];

const CUSTOM_RESOURCES: &[&str] = &[
    "twoSetTemperature",
    "temperatureInUnits",
    "twoSetTemperatureInUnits",
];

/// Payload keys of unit-suffixed attributes: the unit travels in `unit`.
const PAYLOAD_KEYS: &[(&str, &str)] = &[
    (p::CURRENT_TEMPERATURE_C, "currentTemperature"),
    (p::CURRENT_TEMPERATURE_F, "currentTemperature"),
    (p::TARGET_TEMPERATURE_C, "targetTemperature"),
    (p::TARGET_TEMPERATURE_F, "targetTemperature"),
    (p::HEAT_TARGET_TEMPERATURE_C, "heatTargetTemperature"),
    (p::HEAT_TARGET_TEMPERATURE_F, "heatTargetTemperature"),
    (p::COOL_TARGET_TEMPERATURE_C, "coolTargetTemperature"),
    (p::COOL_TARGET_TEMPERATURE_F, "coolTargetTemperature"),
    (p::TWO_SET_HEAT_TARGET_TEMPERATURE_C, "heatTargetTemperature"),
    (p::TWO_SET_HEAT_TARGET_TEMPERATURE_F, "heatTargetTemperature"),
    (p::TWO_SET_COOL_TARGET_TEMPERATURE_C, "coolTargetTemperature"),
    (p::TWO_SET_COOL_TARGET_TEMPERATURE_F, "coolTargetTemperature"),
];

pub(super) const FAMILY: DeviceFamily =
    DeviceFamily::new("air_conditioner", "DEVICE_AIR_CONDITIONER", RESOURCES)
        .with_custom(CustomResourceKind::AirConditioner, CUSTOM_RESOURCES);

fn unit_of(sibling: &Value) -> Option<&str> {
    sibling.get(UNIT).and_then(Value::as_str)
}

pub(super) fn compile_resource(
    ctx: &mut ResourceCompilation<'_>,
    spec: &ResourceSpec,
    raw: &Value,
) {
    let siblings = match raw {
        Value::Array(siblings) => siblings,
        Value::Object(_) => return compile_uniform(ctx, spec, raw),
        _ => return,
    };

    let mut units: Vec<Value> = Vec::new();
    for sibling in siblings {
        let Some(unit) = unit_of(sibling) else {
            trace!(resource = spec.key, "Skipping sibling without unit");
            continue;
        };
        for (raw_key, attribute) in spec.properties {
            if let Some(field) = raw_key.strip_suffix(unit).filter(|f| !f.is_empty()) {
                ctx.register(attribute, AttributeDescriptor::from_raw(sibling, field));
            }
        }
        let unit = Value::from(unit);
        if !units.contains(&unit) {
            units.push(unit);
        }
    }

    if let Some(attribute) = spec.attribute_of(UNIT) {
        ctx.register(attribute, AttributeDescriptor::read_only_enum(units));
    }
}

pub(super) fn apply_property(
    state: &mut DeviceState,
    raw_key: &str,
    attribute: &str,
    fragment: &Value,
    mode: ApplyMode,
) -> bool {
    let Some(siblings) = fragment.as_array() else {
        return false;
    };

    if raw_key == UNIT {
        let mut units = siblings.iter().filter_map(unit_of);
        let first = units.next();
        let unit = if first == Some(CELSIUS) || units.any(|u| u == CELSIUS) {
            Some(CELSIUS)
        } else {
            first
        };
        match (unit, mode) {
            (Some(unit), _) => {
                state.set(attribute, Value::from(unit));
            }
            (None, ApplyMode::Full) => {
                state.set(attribute, Value::Null);
            }
            (None, ApplyMode::Partial) => {}
        }
        return true;
    }

    let Some(unit_char) = raw_key.chars().last() else {
        return false;
    };
    let (field, unit) = raw_key.split_at(raw_key.len() - unit_char.len_utf8());
    let sibling = siblings.iter().find(|s| unit_of(s) == Some(unit));

    match (sibling.and_then(|s| s.get(field)), mode) {
        (Some(value), _) => {
            state.set(attribute, value.clone());
        }
        (None, ApplyMode::Full) => {
            state.set(attribute, Value::Null);
        }
        (None, ApplyMode::Partial) => {}
    }
    true
}

pub(super) fn payload_key(attribute: &str) -> Option<&'static str> {
    PAYLOAD_KEYS
        .iter()
        .find(|(attr, _)| *attr == attribute)
        .map(|(_, key)| *key)
}

pub(super) fn accepts_write(attribute: &str) -> bool {
    attribute == p::TEMPERATURE_UNIT || attribute == p::TWO_SET_TEMPERATURE_UNIT
}

/// Temperature unit of an air conditioner setpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    /// Degrees Celsius (`"C"`).
    Celsius,
    /// Degrees Fahrenheit (`"F"`).
    Fahrenheit,
}

impl TemperatureUnit {
    /// Returns the wire representation of the unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }

    const fn pick(self, celsius: &'static str, fahrenheit: &'static str) -> &'static str {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => fahrenheit,
        }
    }
}

/// Convenience commands for air conditioners.
///
/// Implemented for every [`AttributeControl`]; the commands are validated
/// against the device profile like any other attribute write.
#[allow(async_fn_in_trait)]
pub trait AirConditionerControl: AttributeControl {
    /// Sets the job mode (enum).
    async fn set_current_job_mode(&self, mode: &str) -> Result<ControlResponse> {
        self.do_enum_attribute_command(p::CURRENT_JOB_MODE, mode)
            .await
    }

    /// Sets the air conditioning operation mode (enum).
    async fn set_air_con_operation_mode(&self, operation: &str) -> Result<ControlResponse> {
        self.do_enum_attribute_command(p::AIR_CON_OPERATION_MODE, operation)
            .await
    }

    /// Sets the air cleaning operation mode (enum).
    async fn set_air_clean_operation_mode(&self, operation: &str) -> Result<ControlResponse> {
        self.do_enum_attribute_command(p::AIR_CLEAN_OPERATION_MODE, operation)
            .await
    }

    /// Sets the target temperature, sending the unit along.
    async fn set_target_temperature(
        &self,
        temperature: f64,
        unit: TemperatureUnit,
    ) -> Result<ControlResponse> {
        let attribute = unit.pick(p::TARGET_TEMPERATURE_C, p::TARGET_TEMPERATURE_F);
        self.do_multi_attribute_command(&[
            (attribute, Value::from(temperature)),
            (p::TEMPERATURE_UNIT, Value::from(unit.as_str())),
        ])
        .await
    }

    /// Sets the heating target temperature, sending the unit along.
    async fn set_heat_target_temperature(
        &self,
        temperature: f64,
        unit: TemperatureUnit,
    ) -> Result<ControlResponse> {
        let attribute = unit.pick(p::HEAT_TARGET_TEMPERATURE_C, p::HEAT_TARGET_TEMPERATURE_F);
        self.do_multi_attribute_command(&[
            (attribute, Value::from(temperature)),
            (p::TEMPERATURE_UNIT, Value::from(unit.as_str())),
        ])
        .await
    }

    /// Sets the cooling target temperature, sending the unit along.
    async fn set_cool_target_temperature(
        &self,
        temperature: f64,
        unit: TemperatureUnit,
    ) -> Result<ControlResponse> {
        let attribute = unit.pick(p::COOL_TARGET_TEMPERATURE_C, p::COOL_TARGET_TEMPERATURE_F);
        self.do_multi_attribute_command(&[
            (attribute, Value::from(temperature)),
            (p::TEMPERATURE_UNIT, Value::from(unit.as_str())),
        ])
        .await
    }

    /// Sets the dual-setpoint heating temperature.
    ///
    /// The cooling side is resent with its current value.
    async fn set_two_set_heat_target_temperature(
        &self,
        temperature: f64,
        unit: TemperatureUnit,
    ) -> Result<ControlResponse> {
        let heat = unit.pick(
            p::TWO_SET_HEAT_TARGET_TEMPERATURE_C,
            p::TWO_SET_HEAT_TARGET_TEMPERATURE_F,
        );
        let cool = unit.pick(
            p::TWO_SET_COOL_TARGET_TEMPERATURE_C,
            p::TWO_SET_COOL_TARGET_TEMPERATURE_F,
        );
        let current_cool = self.attribute_status(cool).cloned().unwrap_or(Value::Null);
        self.do_multi_attribute_command(&[
            (heat, Value::from(temperature)),
            (cool, current_cool),
            (p::TWO_SET_TEMPERATURE_UNIT, Value::from(unit.as_str())),
        ])
        .await
    }

    /// Sets the dual-setpoint cooling temperature.
    ///
    /// The heating side is resent with its current value.
    async fn set_two_set_cool_target_temperature(
        &self,
        temperature: f64,
        unit: TemperatureUnit,
    ) -> Result<ControlResponse> {
        let heat = unit.pick(
            p::TWO_SET_HEAT_TARGET_TEMPERATURE_C,
            p::TWO_SET_HEAT_TARGET_TEMPERATURE_F,
        );
        let cool = unit.pick(
            p::TWO_SET_COOL_TARGET_TEMPERATURE_C,
            p::TWO_SET_COOL_TARGET_TEMPERATURE_F,
        );
        let current_heat = self.attribute_status(heat).cloned().unwrap_or(Value::Null);
        self.do_multi_attribute_command(&[
            (heat, current_heat),
            (cool, Value::from(temperature)),
            (p::TWO_SET_TEMPERATURE_UNIT, Value::from(unit.as_str())),
        ])
        .await
    }

    /// Starts the device after a delay.
    async fn set_relative_time_to_start(&self, hour: u32, minute: u32) -> Result<ControlResponse> {
        self.do_multi_attribute_command(&[
            (p::RELATIVE_HOUR_TO_START, Value::from(hour)),
            (p::RELATIVE_MINUTE_TO_START, Value::from(minute)),
        ])
        .await
    }

    /// Stops the device after a delay. A zero minute is not sent.
    async fn set_relative_time_to_stop(&self, hour: u32, minute: u32) -> Result<ControlResponse> {
        let mut attributes = vec![(p::RELATIVE_HOUR_TO_STOP, Value::from(hour))];
        if minute != 0 {
            attributes.push((p::RELATIVE_MINUTE_TO_STOP, Value::from(minute)));
        }
        self.do_multi_attribute_command(&attributes).await
    }

    /// Starts the device at a wall-clock time.
    async fn set_absolute_time_to_start(&self, hour: u32, minute: u32) -> Result<ControlResponse> {
        self.do_multi_attribute_command(&[
            (p::ABSOLUTE_HOUR_TO_START, Value::from(hour)),
            (p::ABSOLUTE_MINUTE_TO_START, Value::from(minute)),
        ])
        .await
    }

    /// Stops the device at a wall-clock time.
    async fn set_absolute_time_to_stop(&self, hour: u32, minute: u32) -> Result<ControlResponse> {
        self.do_multi_attribute_command(&[
            (p::ABSOLUTE_HOUR_TO_STOP, Value::from(hour)),
            (p::ABSOLUTE_MINUTE_TO_STOP, Value::from(minute)),
        ])
        .await
    }

    /// Arms the sleep timer.
    async fn set_sleep_timer_relative_time_to_stop(
        &self,
        hour: u32,
        minute: u32,
    ) -> Result<ControlResponse> {
        self.do_multi_attribute_command(&[
            (p::SLEEP_TIMER_RELATIVE_HOUR_TO_STOP, Value::from(hour)),
            (p::SLEEP_TIMER_RELATIVE_MINUTE_TO_STOP, Value::from(minute)),
        ])
        .await
    }

    /// Turns power saving on or off.
    async fn set_power_save_enabled(&self, enabled: bool) -> Result<ControlResponse> {
        self.do_attribute_command(p::POWER_SAVE_ENABLED, enabled)
            .await
    }

    /// Sets the fan speed (enum).
    async fn set_wind_strength(&self, strength: &str) -> Result<ControlResponse> {
        self.do_enum_attribute_command(p::WIND_STRENGTH, strength)
            .await
    }

    /// Sets the fan step (range).
    async fn set_wind_step(&self, step: i64) -> Result<ControlResponse> {
        self.do_range_attribute_command(p::WIND_STEP, step).await
    }

    /// Sets the monitoring mode (enum).
    async fn set_monitoring_enabled(&self, monitoring: &str) -> Result<ControlResponse> {
        self.do_enum_attribute_command(p::MONITORING_ENABLED, monitoring)
            .await
    }

    /// Sets the display light level (enum).
    async fn set_display_light(&self, light: &str) -> Result<ControlResponse> {
        self.do_enum_attribute_command(p::DISPLAY_LIGHT, light)
            .await
    }

    /// Turns vertical swing on or off.
    async fn set_wind_rotate_up_down(&self, enabled: bool) -> Result<ControlResponse> {
        self.do_attribute_command(p::WIND_ROTATE_UP_DOWN, enabled)
            .await
    }

    /// Turns horizontal swing on or off.
    async fn set_wind_rotate_left_right(&self, enabled: bool) -> Result<ControlResponse> {
        self.do_attribute_command(p::WIND_ROTATE_LEFT_RIGHT, enabled)
            .await
    }
}

impl<C: AttributeControl> AirConditionerControl for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CapabilityProfile;
    use crate::types::{ValueDomain, ValueType};
    use serde_json::json;

    fn temperature_schema() -> Value {
        json!({"property": {
            "temperatureInUnits": [
                {
                    "unit": "C",
                    "currentTemperature": {"type": "number", "mode": "r"},
                    "targetTemperature": {"type": "range", "mode": "rw", "value": {"w": {"min": 18, "max": 30, "step": 1}}}
                },
                {
                    "unit": "F",
                    "currentTemperature": {"type": "number", "mode": "r"},
                    "targetTemperature": {"type": "range", "mode": "rw", "value": {"w": {"min": 64, "max": 86, "step": 2}}}
                }
            ],
            "twoSetTemperature": {"twoSetEnabled": {"type": "boolean", "mode": "r"}}
        }})
    }

    #[test]
    fn unit_siblings_compile_per_unit() {
        let profile = CapabilityProfile::compile(&FAMILY, &temperature_schema()).unwrap();

        let target_f = profile.descriptor(p::TARGET_TEMPERATURE_F).unwrap();
        assert_eq!(target_f.value_type(), Some(ValueType::Range));
        let range = target_f.writable_values().and_then(ValueDomain::as_range);
        assert_eq!(range.map(|r| r.step), Some(2.0));
        assert_eq!(target_f.unit(), Some("F"));

        let unit = profile.descriptor(p::TEMPERATURE_UNIT).unwrap();
        assert_eq!(unit.value_type(), Some(ValueType::Enum));
        assert_eq!(
            unit.readable_values().and_then(ValueDomain::as_values),
            Some(&[json!("C"), json!("F")][..])
        );
        assert!(!unit.is_writable());
        assert!(profile.is_writable(p::TEMPERATURE_UNIT));

        assert!(!profile.is_readable(p::HEAT_TARGET_TEMPERATURE_C));
        assert!(profile.is_readable(p::TWO_SET_ENABLED));
        assert!(!profile.is_writable(p::TWO_SET_TEMPERATURE_UNIT));
    }

    #[test]
    fn unit_suffixed_status_reads_matching_sibling() {
        let mut state = DeviceState::new();
        let fragment = json!([
            {"unit": "C", "targetTemperature": 24},
            {"unit": "F", "targetTemperature": 75}
        ]);
        for (raw_key, attribute) in [
            ("targetTemperatureC", p::TARGET_TEMPERATURE_C),
            ("targetTemperatureF", p::TARGET_TEMPERATURE_F),
            (UNIT, p::TEMPERATURE_UNIT),
        ] {
            let mode = ApplyMode::Full;
            assert!(apply_property(&mut state, raw_key, attribute, &fragment, mode));
        }
        assert_eq!(state.value(p::TARGET_TEMPERATURE_C), Some(&json!(24)));
        assert_eq!(state.value(p::TARGET_TEMPERATURE_F), Some(&json!(75)));
        assert_eq!(state.value(p::TEMPERATURE_UNIT), Some(&json!("C")));
    }

    #[test]
    fn missing_sibling_clears_in_full_and_keeps_in_partial() {
        let mut state = DeviceState::new();
        state.set(p::TARGET_TEMPERATURE_F, json!(75));
        let fragment = json!([{"unit": "C", "targetTemperature": 24}]);

        let (key, attr) = ("targetTemperatureF", p::TARGET_TEMPERATURE_F);

        apply_property(&mut state, key, attr, &fragment, ApplyMode::Partial);
        assert_eq!(state.value(attr), Some(&json!(75)));

        apply_property(&mut state, key, attr, &fragment, ApplyMode::Full);
        assert_eq!(state.value(attr), None);
    }

    #[test]
    fn flat_fragment_uses_standard_path() {
        let mut state = DeviceState::new();
        let fragment = json!({"twoSetEnabled": true});
        let applied = apply_property(
            &mut state,
            "twoSetEnabled",
            p::TWO_SET_ENABLED,
            &fragment,
            ApplyMode::Full,
        );
        assert!(!applied);
    }

    #[test]
    fn payload_keys_drop_unit_suffix() {
        assert_eq!(
            payload_key(p::TARGET_TEMPERATURE_F),
            Some("targetTemperature")
        );
        assert_eq!(
            payload_key(p::TWO_SET_COOL_TARGET_TEMPERATURE_C),
            Some("coolTargetTemperature")
        );
        assert_eq!(payload_key(p::WIND_STEP), None);
    }

    #[test]
    fn temperature_unit_wire_values() {
        assert_eq!(TemperatureUnit::Celsius.as_str(), "C");
        assert_eq!(TemperatureUnit::Fahrenheit.as_str(), "F");
    }
}
