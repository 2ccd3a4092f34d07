// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command definitions for the smart plug control protocol.
//!
//! Every operation the device understands is one [`Command`] variant.
//! Serialization to the wire form is a pure function of the variant: no
//! I/O, no shared builder state, byte-for-byte deterministic output.
//!
//! # Command structure
//!
//! Each command document consists of:
//! - A `SMARTPLUG` root element carrying the fixed `id="edimax"` device
//!   identifier
//! - One `CMD` element whose `id` attribute is `"get"` for reads and
//!   `"setup"` for the state write
//! - A child element naming the device attribute path being read or
//!   written; metering reads wrap it in a `NOW_POWER` element

use std::fmt;

use crate::types::PowerState;

/// Device identifier carried on every command envelope.
const DEVICE_ID: &str = "edimax";

/// Attribute path for the relay state.
const STATE_PATH: &str = "Device.System.Power.State";

/// Attribute path for instantaneous power draw (watts).
const NOW_POWER_PATH: &str = "Device.System.Power.NowPower";

/// Attribute path for cumulative daily energy (kWh).
const NOW_ENERGY_DAY_PATH: &str = "Device.System.Power.NowEnergy.Day";

/// A command that can be sent to the plug.
///
/// # Examples
///
/// ```
/// use edimax_plug::{Command, PowerState};
///
/// let cmd = Command::SetState(PowerState::On);
/// assert_eq!(
///     cmd.to_xml(),
///     "<SMARTPLUG id=\"edimax\"><CMD id=\"setup\">\
///      <Device.System.Power.State>ON</Device.System.Power.State>\
///      </CMD></SMARTPLUG>",
/// );
///
/// let query = Command::GetState;
/// assert_eq!(
///     query.to_xml(),
///     "<SMARTPLUG id=\"edimax\"><CMD id=\"get\">\
///      <Device.System.Power.State/></CMD></SMARTPLUG>",
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Query the current relay state.
    GetState,
    /// Set the relay state.
    SetState(PowerState),
    /// Query instantaneous power draw in watts (SP-2101W only).
    GetNowPower,
    /// Query today's cumulative energy in kWh (SP-2101W only).
    GetNowEnergyDay,
}

impl Command {
    /// Returns the `CMD` element's `id` attribute for this command.
    #[must_use]
    pub const fn cmd_id(&self) -> &'static str {
        match self {
            Self::GetState | Self::GetNowPower | Self::GetNowEnergyDay => "get",
            Self::SetState(_) => "setup",
        }
    }

    /// Returns the metering attribute name this command reads, if any.
    ///
    /// Used by response interpretation to label non-numeric readings.
    #[must_use]
    pub const fn metering_attribute(&self) -> Option<&'static str> {
        match self {
            Self::GetNowPower => Some("NowPower"),
            Self::GetNowEnergyDay => Some("NowEnergy.Day"),
            Self::GetState | Self::SetState(_) => None,
        }
    }

    /// Serializes the command to its XML wire form.
    ///
    /// Pure and deterministic: the same variant always yields the same
    /// bytes.
    #[must_use]
    pub fn to_xml(&self) -> String {
        match self {
            Self::GetState => format!(
                "<SMARTPLUG id=\"{DEVICE_ID}\"><CMD id=\"get\"><{STATE_PATH}/></CMD></SMARTPLUG>"
            ),
            Self::SetState(state) => format!(
                "<SMARTPLUG id=\"{DEVICE_ID}\"><CMD id=\"setup\">\
                 <{STATE_PATH}>{state}</{STATE_PATH}></CMD></SMARTPLUG>"
            ),
            Self::GetNowPower => Self::metering_xml(NOW_POWER_PATH),
            Self::GetNowEnergyDay => Self::metering_xml(NOW_ENERGY_DAY_PATH),
        }
    }

    fn metering_xml(path: &str) -> String {
        format!(
            "<SMARTPLUG id=\"{DEVICE_ID}\"><CMD id=\"get\">\
             <NOW_POWER><{path}/></NOW_POWER></CMD></SMARTPLUG>"
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetState => write!(f, "GetState"),
            Self::SetState(state) => write!(f, "SetState({state})"),
            Self::GetNowPower => write!(f, "GetNowPower"),
            Self::GetNowEnergyDay => write!(f, "GetNowEnergyDay"),
        }
    }
}
