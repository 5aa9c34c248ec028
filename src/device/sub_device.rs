// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-location view of a composite device.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::AttributeControl;
use crate::command::{CommandBuilder, ControlPayload};
use crate::error::Result;
use crate::family::{Composition, LocationLayout};
use crate::profile::location::entry_tag;
use crate::profile::{CapabilityProfile, Location};
use crate::protocol::{ControlResponse, Transport};
use crate::state::{ApplyMode, DeviceState};

/// One location of a composite device (a cooking zone, a compartment).
///
/// Sub-devices share the parent's transport and device identifier; their
/// control payloads carry the location tag.
#[derive(Debug)]
pub struct SubDevice<T: Transport> {
    device_id: String,
    location: Location,
    layout: LocationLayout,
    partitioned: &'static [&'static str],
    profile: CapabilityProfile,
    state: DeviceState,
    transport: Arc<T>,
}

impl<T: Transport> SubDevice<T> {
    pub(crate) fn new(
        device_id: &str,
        location: Location,
        profile: CapabilityProfile,
        composition: &Composition,
        transport: Arc<T>,
    ) -> Self {
        Self {
            device_id: device_id.to_string(),
            location,
            layout: composition.layout,
            partitioned: composition.partitioned,
            profile,
            state: DeviceState::new(),
            transport,
        }
    }

    /// Returns the location of this sub-device.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the compiled profile of this location.
    #[must_use]
    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

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

    /// Returns every readable attribute that has a value.
    #[must_use]
    pub fn status_snapshot(&self) -> BTreeMap<String, Value> {
        self.state.status_snapshot(&self.profile)
    }

    fn matches(&self, entry: &Value) -> bool {
        entry_tag(self.layout, entry) == Some(self.location.key())
    }

    /// Applies the part of a parent status payload addressed to this location.
    pub(crate) fn apply_status(&mut self, status: &Value, mode: ApplyMode) -> Vec<String> {
        match status {
            Value::Array(entries) => {
                let Some(entry) = entries.iter().find(|entry| self.matches(entry)) else {
                    trace!(
                        location = self.location.key(),
                        "No status entry for location"
                    );
                    return Vec::new();
                };
                let scoped = match (self.layout, self.partitioned.first()) {
                    (LocationLayout::Flat, Some(resource)) => wrap(resource, entry),
                    _ => entry.clone(),
                };
                trace!(location = self.location.key(), "Applying location entry");
                self.state.apply(&self.profile, &scoped, mode)
            }
            Value::Object(payload) => {
                for resource in self.partitioned {
                    let Some(Value::Array(entries)) = payload.get(*resource) else {
                        continue;
                    };
                    if let Some(entry) = entries.iter().find(|entry| self.matches(entry)) {
                        trace!(
                            location = self.location.key(),
                            resource = *resource,
                            "Applying partitioned resource entry"
                        );
                        let scoped = wrap(resource, entry);
                        return self.state.apply(&self.profile, &scoped, mode);
                    }
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

fn wrap(resource: &str, entry: &Value) -> Value {
    let mut body = Map::new();
    body.insert(resource.to_string(), entry.clone());
    Value::Object(body)
}

impl<T: Transport> AttributeControl for SubDevice<T> {
    fn command_builder(&self) -> CommandBuilder<'_> {
        CommandBuilder::for_location(
            &self.profile,
            self.layout,
            self.location.key(),
            self.partitioned,
        )
    }

    fn attribute_status(&self, attribute: &str) -> Option<&Value> {
        self.get_status(attribute)
    }

    async fn submit(&self, payload: ControlPayload) -> Result<ControlResponse> {
        debug!(
            device_id = %self.device_id,
            location = self.location.key(),
            "Posting control payload"
        );
        let body = self
            .transport
            .post_device_control(&self.device_id, &payload)
            .await?;
        Ok(ControlResponse::new(body))
    }
}
