// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ThinQ` Lib - Capability profiles and state for `ThinQ` connected appliances.
//!
//! The platform describes every appliance with a capability schema and
//! reports its state as JSON payloads keyed by raw resource names. This
//! library turns both into a stable, canonical attribute model:
//!
//! - **Profiles**: compile a schema once into per-attribute descriptors
//!   (type, access, allowed values)
//! - **State**: reconcile full snapshots and partial updates into a value
//!   store, reading back only what the profile declares readable
//! - **Commands**: validate writes against the profile and build the
//!   control payload the platform expects
//! - **Composite devices**: split cooktops and refrigerators into one
//!   sub-device per location
//!
//! Network access is delegated to a caller-supplied
//! [`Transport`](protocol::Transport).
//!
//! # Supported Appliances
//!
//! - Air conditioners (`DEVICE_AIR_CONDITIONER`)
//! - Cooktops (`DEVICE_COOKTOP`)
//! - Refrigerators (`DEVICE_REFRIGERATOR`)
//!
//! Other appliances can be described with a custom
//! [`DeviceFamily`](family::DeviceFamily).
//!
//! # Quick Start
//!
//! ```no_run
//! use thinq_lib::device::{Device, DeviceInfo};
//! use thinq_lib::family::{AirConditionerControl, TemperatureUnit};
//! # use thinq_lib::protocol::Transport;
//!
//! # async fn example<T: Transport>(transport: T) -> thinq_lib::Result<()> {
//! let info = DeviceInfo::new("ac-living-room", "DEVICE_AIR_CONDITIONER");
//! let mut device = Device::builder(transport, info).build().await?;
//!
//! println!("current: {:?}", device.get_f64("current_temperature_c"));
//! device.set_target_temperature(22.0, TemperatureUnit::Celsius).await?;
//! device.refresh_status().await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod command;
pub mod device;
pub mod error;
pub mod family;
pub mod profile;
pub mod protocol;
pub mod push;
pub mod state;
pub mod types;

pub use device::{AttributeControl, Device, DeviceBuilder, DeviceInfo, SubDevice};
pub use error::{CommandError, ConfigurationError, Error, ParseError, ProtocolError, Result};
pub use family::DeviceFamily;
pub use profile::CapabilityProfile;
pub use protocol::{ControlResponse, Transport};
pub use push::PushMessage;
