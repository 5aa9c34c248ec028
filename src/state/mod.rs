// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.
//!
//! The [`DeviceState`] holds the last known value of every attribute of a
//! device. It is fed status payloads in one of two [`ApplyMode`]s:
//!
//! - [`ApplyMode::Full`] - the payload is a complete snapshot; attributes it
//!   does not mention are cleared.
//! - [`ApplyMode::Partial`] - the payload is a delta; only attributes it
//!   mentions are touched.
//!
//! Reads go through [`DeviceState::get_status`], which only exposes
//! attributes the profile declares readable.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use thinq_lib::catalog::property;
//! use thinq_lib::family::DeviceFamily;
//! use thinq_lib::profile::CapabilityProfile;
//! use thinq_lib::state::DeviceState;
//!
//! let schema = json!({"property": {"airFlow": {
//!     "windStrength": {"type": "enum", "mode": "rw", "value": {"r": ["LOW", "HIGH"], "w": ["LOW", "HIGH"]}}
//! }}});
//! let profile = CapabilityProfile::compile(&DeviceFamily::air_conditioner(), &schema)?;
//!
//! let mut state = DeviceState::new();
//! state.set_status(&profile, &json!({"airFlow": {"windStrength": "HIGH"}}));
//! assert_eq!(state.get_status(&profile, property::WIND_STRENGTH), Some(&json!("HIGH")));
//!
//! state.update_status(&profile, &json!({"airFlow": {"windStrength": "LOW"}}));
//! assert_eq!(state.get_str(&profile, property::WIND_STRENGTH), Some("LOW"));
//! # Ok::<(), thinq_lib::error::ConfigurationError>(())
//! ```

mod device_state;
mod reconcile;

pub use device_state::DeviceState;

/// How a status payload is reconciled with the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Complete snapshot: unmentioned attributes are cleared.
    Full,
    /// Delta: only mentioned attributes change.
    Partial,
}
