// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push messages delivered by the platform.
//!
//! The platform pushes two kinds of messages per device: status deltas
//! (`DEVICE_STATUS`) carrying a `report` shaped like a partial status
//! payload, and event notifications (`DEVICE_PUSH`) carrying a `pushCode`.
//! Feed them to [`Device::handle_push`](crate::device::Device::handle_push).

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// Kind of push message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PushType {
    /// Partial status update.
    #[serde(rename = "DEVICE_STATUS")]
    DeviceStatus,
    /// Event notification.
    #[serde(rename = "DEVICE_PUSH")]
    DevicePush,
    /// Any other message kind.
    #[serde(other)]
    Other,
}

/// A push message addressed to one device.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Kind of message.
    pub push_type: PushType,
    /// Addressed device.
    pub device_id: String,
    /// Status delta of a `DEVICE_STATUS` message.
    #[serde(default)]
    pub report: Option<Value>,
    /// Notification code of a `DEVICE_PUSH` message.
    #[serde(default)]
    pub push_code: Option<String>,
}

impl PushMessage {
    /// Parses a push message from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the text is not a valid push message.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        serde_json::from_str(text).map_err(Into::into)
    }

    /// Parses a push message from an already decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the value is not a valid push message.
    pub fn from_value(value: &Value) -> Result<Self, ParseError> {
        Self::deserialize(value).map_err(Into::into)
    }
}
