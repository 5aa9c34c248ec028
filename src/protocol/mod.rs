// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport abstraction for the cloud platform.
//!
//! The library never opens connections itself. Callers supply a
//! [`Transport`] that knows how to reach the platform (REST client, test
//! double, recorded fixtures) and devices delegate every network operation
//! to it.
//!
//! # Examples
//!
//! ```
//! use serde_json::{Value, json};
//! use thinq_lib::command::ControlPayload;
//! use thinq_lib::error::ProtocolError;
//! use thinq_lib::protocol::Transport;
//!
//! struct Offline;
//!
//! impl Transport for Offline {
//!     async fn device_profile(&self, _device_id: &str) -> Result<Value, ProtocolError> {
//!         Ok(json!({"property": {}}))
//!     }
//!
//!     async fn device_status(&self, _device_id: &str) -> Result<Value, ProtocolError> {
//!         Ok(json!({}))
//!     }
//!
//!     async fn post_device_control(
//!         &self,
//!         _device_id: &str,
//!         _payload: &ControlPayload,
//!     ) -> Result<Value, ProtocolError> {
//!         Err(ProtocolError::ConnectionFailed("offline".to_string()))
//!     }
//! }
//! ```

use serde_json::Value;

use crate::command::ControlPayload;
use crate::error::ProtocolError;

/// Response to a control request, as returned by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlResponse {
    body: Value,
}

impl ControlResponse {
    /// Wraps a response body.
    #[must_use]
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Parses the response as a specific type.
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be deserialized into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, crate::error::ParseError> {
        T::deserialize(&self.body).map_err(Into::into)
    }
}

/// Operations a device needs from the platform.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Fetches the capability schema of a device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the platform cannot be reached or rejects
    /// the request.
    async fn device_profile(&self, device_id: &str) -> Result<Value, ProtocolError>;

    /// Fetches a complete status snapshot of a device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the platform cannot be reached or rejects
    /// the request.
    async fn device_status(&self, device_id: &str) -> Result<Value, ProtocolError>;

    /// Posts a control payload to a device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the platform cannot be reached or rejects
    /// the command.
    async fn post_device_control(
        &self,
        device_id: &str,
        payload: &ControlPayload,
    ) -> Result<Value, ProtocolError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ack {
        #[serde(rename = "resultCode")]
        result_code: String,
    }

    #[test]
    fn control_response_parse() {
        let response = ControlResponse::new(json!({"resultCode": "0000"}));
        let ack: Ack = response.parse().unwrap();
        assert_eq!(ack.result_code, "0000");
        assert_eq!(response.body()["resultCode"], "0000");
    }

    #[test]
    fn control_response_parse_error() {
        let response = ControlResponse::new(json!([1, 2]));
        assert!(response.parse::<Ack>().is_err());
    }
}
