// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical names for resources, attributes and locations.
//!
//! These are the stable identifiers exposed to callers. Device families map
//! raw schema keys onto them; see [`crate::family`].

/// Canonical resource identifiers.
pub mod resource {
    pub const AIR_CON_JOB_MODE: &str = "air_con_job_mode";
    pub const AIR_FLOW: &str = "air_flow";
    pub const AIR_QUALITY_SENSOR: &str = "air_quality_sensor";
    pub const COOKING_ZONE: &str = "cooking_zone";
    pub const DISPLAY: &str = "display";
    pub const ECO_FRIENDLY: &str = "eco_friendly";
    pub const FILTER_INFO: &str = "filter_info";
    pub const OPERATION: &str = "operation";
    pub const POWER: &str = "power";
    pub const POWER_SAVE: &str = "power_save";
    pub const REFRIGERATION: &str = "refrigeration";
    pub const REMOTE_CONTROL_ENABLE: &str = "remote_control_enable";
    pub const SLEEP_TIMER: &str = "sleep_timer";
    pub const TEMPERATURE: &str = "temperature";
    pub const TIMER: &str = "timer";
    pub const TWO_SET_TEMPERATURE: &str = "two_set_temperature";
    pub const WIND_DIRECTION: &str = "wind_direction";
}

/// Canonical attribute identifiers.
pub mod property {
    pub const ABSOLUTE_HOUR_TO_START: &str = "absolute_hour_to_start";
    pub const ABSOLUTE_HOUR_TO_STOP: &str = "absolute_hour_to_stop";
    pub const ABSOLUTE_MINUTE_TO_START: &str = "absolute_minute_to_start";
    pub const ABSOLUTE_MINUTE_TO_STOP: &str = "absolute_minute_to_stop";
    pub const AIR_CLEAN_OPERATION_MODE: &str = "air_clean_operation_mode";
    pub const AIR_CON_OPERATION_MODE: &str = "air_con_operation_mode";
    pub const COOL_TARGET_TEMPERATURE_C: &str = "cool_target_temperature_c";
    pub const COOL_TARGET_TEMPERATURE_F: &str = "cool_target_temperature_f";
    pub const CURRENT_JOB_MODE: &str = "current_job_mode";
    pub const CURRENT_STATE: &str = "current_state";
    pub const CURRENT_TEMPERATURE_C: &str = "current_temperature_c";
    pub const CURRENT_TEMPERATURE_F: &str = "current_temperature_f";
    pub const DISPLAY_LIGHT: &str = "display_light";
    pub const ECO_FRIENDLY_MODE: &str = "eco_friendly_mode";
    pub const EXPRESS_MODE: &str = "express_mode";
    pub const FILTER_LIFETIME: &str = "filter_lifetime";
    pub const FILTER_REMAIN_PERCENT: &str = "filter_remain_percent";
    pub const HEAT_TARGET_TEMPERATURE_C: &str = "heat_target_temperature_c";
    pub const HEAT_TARGET_TEMPERATURE_F: &str = "heat_target_temperature_f";
    pub const HUMIDITY: &str = "humidity";
    pub const MONITORING_ENABLED: &str = "monitoring_enabled";
    pub const ODOR: &str = "odor";
    pub const ODOR_LEVEL: &str = "odor_level";
    pub const PM1: &str = "pm1";
    pub const PM10: &str = "pm10";
    pub const PM2: &str = "pm2";
    pub const POWER_LEVEL: &str = "power_level";
    pub const POWER_SAVE_ENABLED: &str = "power_save_enabled";
    pub const RAPID_FREEZE: &str = "rapid_freeze";
    pub const RELATIVE_HOUR_TO_START: &str = "relative_hour_to_start";
    pub const RELATIVE_HOUR_TO_STOP: &str = "relative_hour_to_stop";
    pub const RELATIVE_MINUTE_TO_START: &str = "relative_minute_to_start";
    pub const RELATIVE_MINUTE_TO_STOP: &str = "relative_minute_to_stop";
    pub const REMAIN_HOUR: &str = "remain_hour";
    pub const REMAIN_MINUTE: &str = "remain_minute";
    pub const REMOTE_CONTROL_ENABLED: &str = "remote_control_enabled";
    pub const SLEEP_TIMER_RELATIVE_HOUR_TO_STOP: &str = "sleep_timer_relative_hour_to_stop";
    pub const SLEEP_TIMER_RELATIVE_MINUTE_TO_STOP: &str = "sleep_timer_relative_minute_to_stop";
    pub const TARGET_TEMPERATURE: &str = "target_temperature";
    pub const TARGET_TEMPERATURE_C: &str = "target_temperature_c";
    pub const TARGET_TEMPERATURE_F: &str = "target_temperature_f";
    pub const TEMPERATURE_UNIT: &str = "temperature_unit";
    pub const TOTAL_POLLUTION: &str = "total_pollution";
    pub const TOTAL_POLLUTION_LEVEL: &str = "total_pollution_level";
    pub const TWO_SET_COOL_TARGET_TEMPERATURE_C: &str = "two_set_cool_target_temperature_c";
    pub const TWO_SET_COOL_TARGET_TEMPERATURE_F: &str = "two_set_cool_target_temperature_f";
    pub const TWO_SET_ENABLED: &str = "two_set_enabled";
    pub const TWO_SET_HEAT_TARGET_TEMPERATURE_C: &str = "two_set_heat_target_temperature_c";
    pub const TWO_SET_HEAT_TARGET_TEMPERATURE_F: &str = "two_set_heat_target_temperature_f";
    pub const TWO_SET_TEMPERATURE_UNIT: &str = "two_set_temperature_unit";
    pub const USED_TIME: &str = "used_time";
    pub const WIND_ROTATE_LEFT_RIGHT: &str = "wind_rotate_left_right";
    pub const WIND_ROTATE_UP_DOWN: &str = "wind_rotate_up_down";
    pub const WIND_STEP: &str = "wind_step";
    pub const WIND_STRENGTH: &str = "wind_strength";

    /// Synthetic attribute holding the last push notification code.
    pub const NOTIFICATION: &str = "notification";
    /// Synthetic attribute holding the device-level error code.
    pub const ERROR: &str = "error";
}

/// Canonical location names used by composite devices.
pub mod location {
    pub const CENTER: &str = "center";
    pub const CENTER_FRONT: &str = "center_front";
    pub const CENTER_REAR: &str = "center_rear";
    pub const LEFT_FRONT: &str = "left_front";
    pub const LEFT_REAR: &str = "left_rear";
    pub const RIGHT_FRONT: &str = "right_front";
    pub const RIGHT_REAR: &str = "right_rear";
    pub const FRIDGE: &str = "fridge";
    pub const FREEZER: &str = "freezer";
    pub const CONVERTIBLE: &str = "convertible";
}
