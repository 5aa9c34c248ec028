// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types describing device attributes.
//!
//! # Types
//!
//! - [`AttributeDescriptor`] - Access flags and value domain of an attribute
//! - [`ValueType`] - Declared type (boolean, string, enum, range, list)
//! - [`ValueDomain`] - Allowed values of an enum, range or list attribute
//! - [`RangeSpec`] - Numeric bounds, step and exclusions

mod descriptor;

pub use descriptor::{AttributeDescriptor, RangeSpec, ValueDomain, ValueType};
