// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for the smart plug control protocol.
//!
//! Replies arrive as small XML documents. The value of interest lives in
//! the `CMD` element: either as its direct text content (state-change
//! acknowledgements, error echoes) or nested inside attribute-named
//! child elements (state queries, metering queries). [`command_value`]
//! performs that extraction; the typed helpers interpret the extracted
//! token for each operation.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::ProtocolError;
use crate::types::PowerState;

/// Extracts the `CMD` value from a reply document.
///
/// Locates the first `CMD` element (replies may or may not carry the
/// `SMARTPLUG` envelope) and returns its direct text content if present,
/// otherwise the first non-empty text found while descending into its
/// children.
///
/// # Examples
///
/// ```
/// use edimax_plug::response::command_value;
///
/// assert_eq!(command_value("<CMD>OK</CMD>").unwrap(), "OK");
/// assert_eq!(
///     command_value(
///         "<CMD><Device.System.Power.State>OFF</Device.System.Power.State></CMD>"
///     )
///     .unwrap(),
///     "OFF",
/// );
/// ```
///
/// # Errors
///
/// Returns [`ProtocolError::Xml`] if the document is not well-formed and
/// [`ProtocolError::MissingValue`] if no `CMD` value is present.
pub fn command_value(xml: &str) -> Result<String, ProtocolError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_cmd = false;
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                if in_cmd {
                    depth += 1;
                } else if element.name().as_ref() == b"CMD" {
                    in_cmd = true;
                }
            }
            Event::Text(text) if in_cmd => {
                let value = text
                    .unescape()
                    .map_err(quick_xml::Error::from)?
                    .into_owned();
                if !value.is_empty() {
                    return Ok(value);
                }
            }
            Event::End(_) if in_cmd => {
                if depth == 0 {
                    // Walked the whole CMD subtree without finding text.
                    break;
                }
                depth -= 1;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Err(ProtocolError::MissingValue)
}

/// Interprets a state-query reply.
///
/// # Errors
///
/// Returns [`ProtocolError::UnexpectedState`] if the extracted value is
/// anything other than `ON` or `OFF`.
pub fn state_reply(xml: &str) -> Result<PowerState, ProtocolError> {
    let value = command_value(xml)?;
    value
        .parse::<PowerState>()
        .map_err(|_| ProtocolError::UnexpectedState(value))
}

/// Interprets a state-change reply.
///
/// # Errors
///
/// Returns [`ProtocolError::SetupRejected`] if the device answered with
/// anything other than `OK` (e.g. `FAILED`).
pub fn setup_reply(xml: &str) -> Result<(), ProtocolError> {
    let value = command_value(xml)?;
    if value == "OK" {
        Ok(())
    } else {
        Err(ProtocolError::SetupRejected(value))
    }
}

/// Interprets a metering reply as a floating-point reading.
///
/// # Errors
///
/// Returns [`ProtocolError::NonNumericReading`] if the extracted value
/// does not parse as a number. Hardware without metering support answers
/// these queries with empty or non-numeric values; that surfaces here,
/// never as a default of zero.
pub fn metering_reply(xml: &str, reading: &'static str) -> Result<f64, ProtocolError> {
    let value = command_value(xml)?;
    value
        .parse::<f64>()
        .map_err(|_| ProtocolError::NonNumericReading { reading, value })
}
