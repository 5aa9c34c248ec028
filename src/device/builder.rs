// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device builder.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{Device, DeviceInfo};
use crate::error::Result;
use crate::family::DeviceFamily;
use crate::profile::CapabilityProfile;
use crate::protocol::Transport;

/// Builder for [`Device`].
///
/// The family defaults to the built-in one matching the device type.
///
/// # Examples
///
/// ```no_run
/// # use thinq_lib::protocol::Transport;
/// use thinq_lib::device::{Device, DeviceInfo};
/// use thinq_lib::family::DeviceFamily;
///
/// # async fn example<T: Transport>(transport: T) -> thinq_lib::Result<()> {
/// // Fetch schema and status through the transport
/// let device = Device::builder(transport, DeviceInfo::new("fridge-1", "DEVICE_REFRIGERATOR"))
///     .build()
///     .await?;
/// # Ok(())
/// # }
///
/// # fn offline<T: Transport>(transport: T, schema: serde_json::Value) -> thinq_lib::Result<()> {
/// // Compile a known schema without any network call
/// let device = Device::builder(transport, DeviceInfo::new("hob-1", "DEVICE_X"))
///     .with_family(DeviceFamily::cooktop())
///     .build_from_schema(&schema)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DeviceBuilder<T: Transport> {
    transport: T,
    info: DeviceInfo,
    family: Option<DeviceFamily>,
}

impl<T: Transport> DeviceBuilder<T> {
    pub(crate) fn new(transport: T, info: DeviceInfo) -> Self {
        Self {
            transport,
            info,
            family: None,
        }
    }

    /// Uses a specific family instead of resolving it from the device type.
    #[must_use]
    pub fn with_family(mut self, family: DeviceFamily) -> Self {
        self.family = Some(family);
        self
    }

    fn resolve_family(&self) -> Result<DeviceFamily> {
        match self.family {
            Some(family) => Ok(family),
            None => Ok(DeviceFamily::for_device_type(&self.info.device_type)?),
        }
    }

    /// Fetches the schema and an initial status snapshot, then builds the
    /// device.
    ///
    /// # Errors
    ///
    /// Returns an error if the family cannot be resolved, the transport
    /// fails or the schema cannot be compiled.
    pub async fn build(self) -> Result<Device<T>> {
        let family = self.resolve_family()?;
        let schema = self.transport.device_profile(&self.info.device_id).await?;
        let mut device = Self::assemble(self.transport, self.info, &family, &schema)?;

        let status = device
            .transport
            .device_status(&device.info.device_id)
            .await?;
        device.set_status(&status);
        Ok(device)
    }

    /// Builds the device from an already known schema, without calling the
    /// transport. The state starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the family cannot be resolved or the schema cannot
    /// be compiled.
    pub fn build_from_schema(self, schema: &Value) -> Result<Device<T>> {
        let family = self.resolve_family()?;
        Self::assemble(self.transport, self.info, &family, schema)
    }

    fn assemble(
        transport: T,
        info: DeviceInfo,
        family: &DeviceFamily,
        schema: &Value,
    ) -> Result<Device<T>> {
        let profile = CapabilityProfile::compile(family, schema)?;
        debug!(
            device_id = %info.device_id,
            family = family.name,
            attributes = profile.registry().len(),
            "Compiled device profile"
        );
        Ok(Device::new(info, Arc::new(transport), family, profile))
    }
}
