// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `edimax_plug` - A Rust library to control Edimax smart plugs.
//!
//! This library speaks the HTTP/XML control protocol of the Edimax
//! SP-1101W and SP-2101W Smart Plug Switch: query and set the relay
//! state, and on metering-capable hardware (SP-2101W) read instantaneous
//! power draw and cumulative daily energy usage.
//!
//! The scope is strictly the protocol client: authentication
//! negotiation, XML command construction, HTTP transport, and response
//! parsing. Discovery, multi-device management, persistence, and
//! scheduling are out of scope.
//!
//! # Quick Start
//!
//! ```no_run
//! use edimax_plug::{PowerState, SmartPlug};
//!
//! #[tokio::main]
//! async fn main() -> edimax_plug::Result<()> {
//!     let plug = SmartPlug::connect("172.16.100.75", "admin", "1234").await?;
//!
//!     // Change the relay state
//!     plug.set_state(PowerState::Off).await?;
//!     plug.set_state(PowerState::On).await?;
//!
//!     // Query and print the current state
//!     println!("{}", plug.state().await?);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Metering (SP-2101W)
//!
//! ```no_run
//! use edimax_plug::SmartPlug;
//!
//! #[tokio::main]
//! async fn main() -> edimax_plug::Result<()> {
//!     let plug = SmartPlug::connect("172.16.100.75", "admin", "1234").await?;
//!
//!     println!("drawing {} W now", plug.now_power().await?);
//!     println!("used {} kWh today", plug.now_energy_day().await?);
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! The device demands either HTTP Basic or HTTP Digest authentication.
//! Construction probes the control endpoint once and resolves the scheme
//! from the `WWW-Authenticate` challenge; the choice is fixed for the
//! lifetime of the client. An unreachable device fails construction with
//! [`Error::Connection`] - there is no silent fallback.

pub mod command;
pub mod error;
pub mod protocol;
pub mod response;
mod plug;
mod types;

pub use command::Command;
pub use error::{Error, ProtocolError, Result, ValueError};
pub use plug::{SmartPlug, SmartPlugBuilder};
pub use protocol::{AuthScheme, Credentials, HttpTransport};
pub use types::PowerState;
