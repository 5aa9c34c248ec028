// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level device abstraction.
//!
//! A [`Device`] binds together the compiled profile, the attribute state and
//! the [`Transport`] used to reach the platform. Composite appliances expose
//! one [`SubDevice`] per location; status payloads given to the main device
//! are fanned out to every sub-device.
//!
//! Devices do not lock internally: status application takes `&mut self`,
//! so callers sharing a device across tasks wrap it in their own mutex.
//!
//! # Examples
//!
//! ```
//! use serde_json::{Value, json};
//! use thinq_lib::command::ControlPayload;
//! use thinq_lib::device::{AttributeControl, Device, DeviceInfo};
//! use thinq_lib::error::ProtocolError;
//! use thinq_lib::family::AirConditionerControl;
//! use thinq_lib::protocol::Transport;
//!
//! struct Echo;
//!
//! impl Transport for Echo {
//!     async fn device_profile(&self, _: &str) -> Result<Value, ProtocolError> {
//!         Ok(json!({"property": {"airFlow": {"windStrength": {
//!             "type": "enum", "mode": "rw", "value": {"r": ["LOW", "HIGH"], "w": ["LOW", "HIGH"]}
//!         }}}}))
//!     }
//!
//!     async fn device_status(&self, _: &str) -> Result<Value, ProtocolError> {
//!         Ok(json!({"airFlow": {"windStrength": "LOW"}}))
//!     }
//!
//!     async fn post_device_control(
//!         &self,
//!         _: &str,
//!         payload: &ControlPayload,
//!     ) -> Result<Value, ProtocolError> {
//!         Ok(serde_json::to_value(payload).unwrap_or_default())
//!     }
//! }
//!
//! # async fn example() -> thinq_lib::Result<()> {
//! let info = DeviceInfo::new("ac-1", "DEVICE_AIR_CONDITIONER");
//! let device = Device::builder(Echo, info).build().await?;
//!
//! assert_eq!(device.get_status("wind_strength"), Some(&json!("LOW")));
//! device.set_wind_strength("HIGH").await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod sub_device;

pub use builder::DeviceBuilder;
pub use sub_device::SubDevice;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::catalog::property;
use crate::command::{CommandBuilder, ControlPayload, WriteKind};
use crate::error::{ParseError, Result};
use crate::family::DeviceFamily;
use crate::profile::CapabilityProfile;
use crate::protocol::{ControlResponse, Transport};
use crate::push::{PushMessage, PushType};
use crate::state::{ApplyMode, DeviceState};

/// Identity of a registered device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Platform device identifier.
    pub device_id: String,
    /// Platform device type (e.g. `DEVICE_AIR_CONDITIONER`).
    pub device_type: String,
    /// Model name, if reported.
    pub model_name: Option<String>,
    /// User-assigned alias, if any.
    pub alias: Option<String>,
    /// Whether the device pushes status updates.
    pub reportable: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceListEntry {
    device_id: String,
    device_info: DeviceListInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceListInfo {
    device_type: String,
    model_name: Option<String>,
    alias: Option<String>,
    #[serde(default)]
    reportable: bool,
}

impl DeviceInfo {
    /// Creates device info with the given identifier and type.
    #[must_use]
    pub fn new(device_id: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_type: device_type.into(),
            model_name: None,
            alias: None,
            reportable: false,
        }
    }

    /// Sets the model name.
    #[must_use]
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Marks the device as pushing status updates.
    #[must_use]
    pub fn with_reportable(mut self, reportable: bool) -> Self {
        self.reportable = reportable;
        self
    }

    /// Parses one entry of the platform device list.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the entry lacks the identifier or the
    /// device type.
    pub fn from_device_list_entry(entry: &Value) -> std::result::Result<Self, ParseError> {
        let entry = DeviceListEntry::deserialize(entry)?;
        Ok(Self {
            device_id: entry.device_id,
            device_type: entry.device_info.device_type,
            model_name: entry.device_info.model_name,
            alias: entry.device_info.alias,
            reportable: entry.device_info.reportable,
        })
    }
}

/// Attribute writes shared by devices and sub-devices.
///
/// Implementors provide the command builder, current readings and the
/// submission path; the `do_*` methods validate and submit in one step. A
/// write that fails validation never reaches the transport.
#[allow(async_fn_in_trait)]
pub trait AttributeControl {
    /// Returns a command builder bound to this device's profile.
    fn command_builder(&self) -> CommandBuilder<'_>;

    /// Returns the current value of a readable attribute.
    fn attribute_status(&self, attribute: &str) -> Option<&Value>;

    /// Submits a validated payload through the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    async fn submit(&self, payload: ControlPayload) -> Result<ControlResponse>;

    /// Writes an attribute without value validation.
    ///
    /// # Errors
    ///
    /// Returns a command error before sending, or a protocol error.
    async fn do_attribute_command(
        &self,
        attribute: &str,
        value: impl Into<Value>,
    ) -> Result<ControlResponse> {
        let payload = self.command_builder().attribute(attribute, value)?;
        self.submit(payload).await
    }

    /// Writes a range attribute.
    ///
    /// # Errors
    ///
    /// Returns a command error before sending, or a protocol error.
    async fn do_range_attribute_command(
        &self,
        attribute: &str,
        value: impl Into<Value>,
    ) -> Result<ControlResponse> {
        let payload = self.command_builder().range_attribute(attribute, value)?;
        self.submit(payload).await
    }

    /// Writes an enum attribute.
    ///
    /// # Errors
    ///
    /// Returns a command error before sending, or a protocol error.
    async fn do_enum_attribute_command(
        &self,
        attribute: &str,
        value: impl Into<Value>,
    ) -> Result<ControlResponse> {
        let payload = self.command_builder().enum_attribute(attribute, value)?;
        self.submit(payload).await
    }

    /// Writes several attributes in one request.
    ///
    /// # Errors
    ///
    /// Returns a command error before sending, or a protocol error.
    async fn do_multi_attribute_command(
        &self,
        attributes: &[(&str, Value)],
    ) -> Result<ControlResponse> {
        let payload = self.command_builder().build(WriteKind::Plain, attributes)?;
        self.submit(payload).await
    }

    /// Writes several range attributes in one request.
    ///
    /// # Errors
    ///
    /// Returns a command error before sending, or a protocol error.
    async fn do_multi_range_attribute_command(
        &self,
        attributes: &[(&str, Value)],
    ) -> Result<ControlResponse> {
        let payload = self.command_builder().build(WriteKind::Range, attributes)?;
        self.submit(payload).await
    }
}

/// A device registered on the platform.
#[derive(Debug)]
pub struct Device<T: Transport> {
    info: DeviceInfo,
    transport: Arc<T>,
    profile: CapabilityProfile,
    state: DeviceState,
    sub_devices: Vec<SubDevice<T>>,
}

impl<T: Transport> Device<T> {
    /// Creates a builder for a device reached through `transport`.
    #[must_use]
    pub fn builder(transport: T, info: DeviceInfo) -> DeviceBuilder<T> {
        DeviceBuilder::new(transport, info)
    }

    pub(crate) fn new(
        info: DeviceInfo,
        transport: Arc<T>,
        family: &DeviceFamily,
        profile: CapabilityProfile,
    ) -> Self {
        let sub_devices = match family.composition {
            Some(composition) => profile
                .sub_profiles()
                .iter()
                .map(|(location, sub_profile)| {
                    SubDevice::new(
                        &info.device_id,
                        location.clone(),
                        sub_profile.clone(),
                        &composition,
                        Arc::clone(&transport),
                    )
                })
                .collect::<Vec<_>>(),
            None => Vec::new(),
        };
        debug!(
            device_id = %info.device_id,
            sub_devices = sub_devices.len(),
            "Created device"
        );
        Self {
            info,
            transport,
            profile,
            state: DeviceState::new(),
            sub_devices,
        }
    }

    // ========== Identity ==========

    /// Returns the device identity.
    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Returns the platform device identifier.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.info.device_id
    }

    /// Returns the compiled capability profile.
    #[must_use]
    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    /// Returns the transport shared with sub-devices.
    #[must_use]
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    // ========== Sub-devices ==========

    /// Returns every sub-device, in location discovery order.
    #[must_use]
    pub fn sub_devices(&self) -> &[SubDevice<T>] {
        &self.sub_devices
    }

    /// Returns the sub-device at a canonical location name.
    #[must_use]
    pub fn sub_device(&self, location_name: &str) -> Option<&SubDevice<T>> {
        self.sub_devices
            .iter()
            .find(|sub| sub.location().name() == location_name)
    }

    // ========== State ==========

    /// Returns the value of a readable attribute.
    #[must_use]
    pub fn get_status(&self, attribute: &str) -> Option<&Value> {
        self.state.get_status(&self.profile, attribute)
    }

    /// Returns a readable attribute as a string.
    #[must_use]
    pub fn get_str(&self, attribute: &str) -> Option<&str> {
        self.state.get_str(&self.profile, attribute)
    }

    /// Returns a readable attribute as a float.
    #[must_use]
    pub fn get_f64(&self, attribute: &str) -> Option<f64> {
        self.state.get_f64(&self.profile, attribute)
    }

    /// Returns a readable attribute as an integer.
    #[must_use]
    pub fn get_i64(&self, attribute: &str) -> Option<i64> {
        self.state.get_i64(&self.profile, attribute)
    }

    /// Returns a readable attribute as a boolean.
    #[must_use]
    pub fn get_bool(&self, attribute: &str) -> Option<bool> {
        self.state.get_bool(&self.profile, attribute)
    }

    /// Returns every readable attribute of the main device that has a value.
    #[must_use]
    pub fn status_snapshot(&self) -> BTreeMap<String, Value> {
        self.state.status_snapshot(&self.profile)
    }

    /// Replaces the state with a complete snapshot, including sub-devices.
    pub fn set_status(&mut self, status: &Value) -> Vec<String> {
        self.apply_status(status, ApplyMode::Full)
    }

    /// Merges a partial update into the state, including sub-devices.
    pub fn update_status(&mut self, status: &Value) -> Vec<String> {
        self.apply_status(status, ApplyMode::Partial)
    }

    fn apply_status(&mut self, status: &Value, mode: ApplyMode) -> Vec<String> {
        let mut changed = self.state.apply(&self.profile, status, mode);
        for sub in &mut self.sub_devices {
            changed.extend(sub.apply_status(status, mode));
        }
        trace!(
            device_id = %self.info.device_id,
            ?mode,
            changed = changed.len(),
            "Applied status"
        );
        changed
    }

    /// Fetches a fresh snapshot from the platform and applies it.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails.
    pub async fn refresh_status(&mut self) -> Result<Vec<String>> {
        let status = self.transport.device_status(&self.info.device_id).await?;
        Ok(self.set_status(&status))
    }

    /// Applies a push message addressed to this device.
    ///
    /// Status pushes are merged as partial updates; event pushes set the
    /// `notification` attribute when the profile declares it. Returns
    /// `false` for messages addressed to another device or carrying nothing
    /// applicable.
    pub fn handle_push(&mut self, message: &PushMessage) -> bool {
        if message.device_id != self.info.device_id {
            return false;
        }
        match (message.push_type, &message.report, &message.push_code) {
            (PushType::DeviceStatus, Some(report), _) => {
                self.update_status(report);
                true
            }
            (PushType::DevicePush, _, Some(code)) if self.profile.notification().is_some() => {
                self.state
                    .set(property::NOTIFICATION, Value::from(code.as_str()));
                true
            }
            _ => {
                trace!(
                    device_id = %self.info.device_id,
                    push_type = ?message.push_type,
                    "Ignoring push message"
                );
                false
            }
        }
    }

    /// Returns the canonical attribute mapped from a raw resource and
    /// property key pair.
    #[must_use]
    pub fn property_key(&self, resource_key: &str, raw_key: &str) -> Option<&'static str> {
        self.profile
            .mapping_table()
            .iter()
            .filter(|spec| spec.key == resource_key)
            .find_map(|spec| spec.attribute_of(raw_key))
    }
}

impl<T: Transport> AttributeControl for Device<T> {
    fn command_builder(&self) -> CommandBuilder<'_> {
        CommandBuilder::new(&self.profile)
    }

    fn attribute_status(&self, attribute: &str) -> Option<&Value> {
        self.get_status(attribute)
    }

    async fn submit(&self, payload: ControlPayload) -> Result<ControlResponse> {
        debug!(device_id = %self.info.device_id, "Posting control payload");
        let body = self
            .transport
            .post_device_control(&self.info.device_id, &payload)
            .await?;
        Ok(ControlResponse::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_info_from_list_entry() {
        let entry = json!({
            "deviceId": "abc",
            "deviceInfo": {
                "deviceType": "DEVICE_COOKTOP",
                "modelName": "HOB-1",
                "alias": "Kitchen",
                "reportable": true
            }
        });
        let info = DeviceInfo::from_device_list_entry(&entry).unwrap();
        assert_eq!(
            info,
            DeviceInfo::new("abc", "DEVICE_COOKTOP")
                .with_model_name("HOB-1")
                .with_alias("Kitchen")
                .with_reportable(true)
        );
    }

    #[test]
    fn device_info_requires_type() {
        let entry = json!({"deviceId": "abc", "deviceInfo": {}});
        assert!(matches!(
            DeviceInfo::from_device_list_entry(&entry),
            Err(ParseError::Json(_))
        ));
    }
}
