// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `edimax_plug` library.
//!
//! Every failure surfaces to the caller as a typed error; nothing is
//! swallowed. The taxonomy separates "could not reach the device"
//! ([`Error::Connection`]) from "the device answered with a bad HTTP
//! status" ([`Error::Transport`]) from "the device answered, but the XML
//! payload violated the protocol" ([`Error::Protocol`]), so callers can
//! distinguish "the plug says OFF" from "could not determine the state".

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The device could not be reached (probe or any subsequent request,
    /// including timeouts).
    #[error("cannot reach device: {0}")]
    Connection(#[source] reqwest::Error),

    /// The device answered with a non-success HTTP status.
    #[error("device returned HTTP {0}")]
    Transport(u16),

    /// The device answered, but the payload violated the protocol.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A caller-supplied value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

/// Errors related to interpreting what the device sent back.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The response body is not well-formed XML.
    #[error("malformed response: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The response parsed, but no `CMD` value could be extracted.
    #[error("response contains no CMD value")]
    MissingValue,

    /// A state query answered with something other than `ON` or `OFF`.
    #[error("unexpected state response: {0:?}")]
    UnexpectedState(String),

    /// The device rejected a state change (anything other than `OK`).
    #[error("device rejected state change: {0:?}")]
    SetupRejected(String),

    /// A metering query answered with a non-numeric value. Hardware
    /// without power metering (SP-1101W) lands here.
    #[error("non-numeric {reading} reading: {value:?}")]
    NonNumericReading {
        /// The metering attribute that was queried.
        reading: &'static str,
        /// The value the device actually sent.
        value: String,
    },

    /// The device issued a Digest challenge we could not answer.
    #[error("unusable authentication challenge: {0}")]
    Challenge(#[from] digest_auth::Error),
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An invalid power state string was provided.
    #[error("invalid power state: {0:?}")]
    InvalidPowerState(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
