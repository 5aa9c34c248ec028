// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `thinq_lib` library.
//!
//! This module provides the error hierarchy for the library: schema
//! configuration, command validation, transport communication and payload
//! parsing. Reading an attribute never produces an error; an attribute that
//! is not available on a device reads as `None`.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The capability schema cannot be used to build a profile.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A control command failed validation against the profile.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// The transport collaborator failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A payload from the platform could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors raised while compiling a capability schema.
///
/// These are fatal: the device cannot be used with the given schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The schema has no property block to compile.
    #[error("schema is missing the `{block}` block")]
    MissingPropertyBlock {
        /// Name of the expected block (`property` or `extensionProperty`).
        block: &'static str,
    },

    /// The property block has a shape the device family cannot compile.
    #[error("schema `{block}` block has an unexpected shape")]
    InvalidPropertyBlock {
        /// Name of the offending block.
        block: &'static str,
    },

    /// A per-location schema entry carries no location tag.
    #[error("location entry without a location name in `{0}`")]
    InvalidLocationEntry(String),

    /// No built-in device family matches the device type.
    #[error("unsupported device type: {0}")]
    UnsupportedDeviceType(String),
}

/// Errors raised by the command builder.
///
/// Every variant is produced before the transport is called.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    /// The attribute is not declared by the device family.
    #[error("unknown attribute: {attribute}")]
    UnknownAttribute {
        /// The requested attribute.
        attribute: String,
    },

    /// The attribute exists but cannot be written on this device.
    #[error("attribute {attribute} is not writable")]
    AttributeNotWritable {
        /// The requested attribute.
        attribute: String,
    },

    /// The value is outside the attribute's writable range.
    #[error("value {value} is out of range for {attribute}")]
    ValueOutOfRange {
        /// The requested attribute.
        attribute: String,
        /// The rejected value.
        value: serde_json::Value,
    },

    /// The value is not one of the attribute's writable values.
    #[error("value {value} is not allowed for {attribute}")]
    ValueNotAllowed {
        /// The requested attribute.
        attribute: String,
        /// The rejected value.
        value: serde_json::Value,
    },
}

/// Errors reported by a [`Transport`](crate::protocol::Transport).
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Connection to the platform failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The platform rejected the request.
    #[error("request rejected ({code}): {message}")]
    Rejected {
        /// Platform error code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

/// Errors related to parsing platform payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
