// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cooktop family: one sub-device per cooking zone.

use super::{Composition, DeviceFamily, LocationLayout};
use crate::catalog::{location as l, property as p, resource as r};
use crate::profile::ResourceSpec;

const ZONE_RESOURCES: &[ResourceSpec] = &[
    ResourceSpec::new(
        "cookingZone",
        r::COOKING_ZONE,
        &[("currentState", p::CURRENT_STATE)],
    ),
    ResourceSpec::new("power", r::POWER, &[("powerLevel", p::POWER_LEVEL)]),
    ResourceSpec::new(
        "remoteControlEnable",
        r::REMOTE_CONTROL_ENABLE,
        &[("remoteControlEnabled", p::REMOTE_CONTROL_ENABLED)],
    ),
    ResourceSpec::new(
        "timer",
        r::TIMER,
        &[
            ("remainHour", p::REMAIN_HOUR),
            ("remainMinute", p::REMAIN_MINUTE),
        ],
    ),
];

const LOCATIONS: &[(&str, &str)] = &[
    ("CENTER", l::CENTER),
    ("CENTER_FRONT", l::CENTER_FRONT),
    ("CENTER_REAR", l::CENTER_REAR),
    ("LEFT_FRONT", l::LEFT_FRONT),
    ("LEFT_REAR", l::LEFT_REAR),
    ("RIGHT_FRONT", l::RIGHT_FRONT),
    ("RIGHT_REAR", l::RIGHT_REAR),
];

pub(super) const FAMILY: DeviceFamily = DeviceFamily::new("cooktop", "DEVICE_COOKTOP", &[])
    .with_composition(Composition {
        layout: LocationLayout::Nested,
        resources: ZONE_RESOURCES,
        partitioned: &[],
        location_map: LOCATIONS,
        use_sub_notification: false,
    });

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::CapabilityProfile;
    use serde_json::json;

    #[test]
    fn zones_become_sub_profiles() {
        let schema = json!({
            "property": [
                {
                    "location": {"locationName": "LEFT_FRONT"},
                    "power": {"powerLevel": {"type": "range", "mode": "rw", "value": {"w": {"min": 0, "max": 9, "step": 1}}}},
                    "cookingZone": {"currentState": {"type": "enum", "mode": "r", "value": {"r": ["INITIAL", "COOKING"]}}}
                },
                {
                    "location": {"locationName": "RIGHT_REAR"},
                    "power": {"powerLevel": {"type": "range", "mode": "r", "value": {"r": {"min": 0, "max": 9}}}}
                }
            ],
            "notification": {"push": ["COOKING_IS_COMPLETE"]}
        });
        let profile = CapabilityProfile::compile(&FAMILY, &schema).unwrap();

        let names: Vec<_> = profile
            .locations()
            .map(|loc| loc.name().to_string())
            .collect();
        assert_eq!(names, vec![l::LEFT_FRONT, l::RIGHT_REAR]);
        assert_eq!(profile.location_key(l::RIGHT_REAR), Some("RIGHT_REAR"));
        assert!(profile.properties().is_empty());
        assert!(profile.error().is_none());
        assert!(profile.notification().is_some());

        let left = profile.sub_profile(l::LEFT_FRONT).unwrap();
        assert!(left.is_writable(p::POWER_LEVEL));
        assert!(left.is_readable(p::CURRENT_STATE));
        assert!(left.notification().is_none());

        let right = profile.sub_profile(l::RIGHT_REAR).unwrap();
        assert!(!right.is_writable(p::POWER_LEVEL));
        assert!(!right.is_readable(p::CURRENT_STATE));
    }
}
