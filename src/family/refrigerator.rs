// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Refrigerator family.
//!
//! Appliance-wide resources live on the main device; `temperature` is
//! published once per compartment and feeds one sub-device each.

use super::{Composition, DeviceFamily, LocationLayout};
use crate::catalog::{location as l, property as p, resource as r};
use crate::profile::ResourceSpec;

const RESOURCES: &[ResourceSpec] = &[
    ResourceSpec::new(
        "powerSave",
        r::POWER_SAVE,
        &[("powerSaveEnabled", p::POWER_SAVE_ENABLED)],
    ),
    ResourceSpec::new(
        "ecoFriendly",
        r::ECO_FRIENDLY,
        &[("ecoFriendlyMode", p::ECO_FRIENDLY_MODE)],
    ),
    ResourceSpec::new(
        "refrigeration",
        r::REFRIGERATION,
        &[
            ("expressMode", p::EXPRESS_MODE),
            ("rapidFreeze", p::RAPID_FREEZE),
        ],
    ),
];

const COMPARTMENT_RESOURCES: &[ResourceSpec] = &[ResourceSpec::new(
    "temperature",
    r::TEMPERATURE,
    &[
        ("targetTemperature", p::TARGET_TEMPERATURE),
        ("unit", p::TEMPERATURE_UNIT),
    ],
)];

const LOCATIONS: &[(&str, &str)] = &[
    ("FRIDGE", l::FRIDGE),
    ("FREEZER", l::FREEZER),
    ("CONVERTIBLE", l::CONVERTIBLE),
];

pub(super) const FAMILY: DeviceFamily =
    DeviceFamily::new("refrigerator", "DEVICE_REFRIGERATOR", RESOURCES).with_composition(
        Composition {
            layout: LocationLayout::Flat,
            resources: COMPARTMENT_RESOURCES,
            partitioned: &["temperature"],
            location_map: LOCATIONS,
            use_sub_notification: false,
        },
    );
