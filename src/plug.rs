// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level client for a single smart plug.

use std::time::Duration;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::protocol::{AuthScheme, Credentials, DEFAULT_PORT, DEFAULT_TIMEOUT, HttpTransport};
use crate::response;
use crate::types::PowerState;

/// Client for one Edimax smart plug.
///
/// Construction probes the device once to resolve its authentication
/// scheme; every accessor afterwards performs a single command exchange.
/// The client keeps no device state between calls, so each reading
/// reflects what the plug reported for that call.
///
/// Calls are not internally synchronized. Callers that issue commands to
/// the same device concurrently must serialize externally or use
/// separate client instances.
///
/// # Examples
///
/// ```no_run
/// use edimax_plug::{PowerState, SmartPlug};
///
/// #[tokio::main]
/// async fn main() -> edimax_plug::Result<()> {
///     let plug = SmartPlug::connect("172.16.100.75", "admin", "1234").await?;
///
///     plug.set_state(PowerState::On).await?;
///     println!("state: {}", plug.state().await?);
///
///     // SP-2101W only
///     println!("draw: {} W", plug.now_power().await?);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SmartPlug {
    transport: HttpTransport,
}

impl SmartPlug {
    /// Connects to the plug at `host` with the given credentials.
    ///
    /// Uses the default control port (10000) and request timeout (10 s);
    /// see [`SmartPlug::builder`] to override either.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the device cannot be reached
    /// during the authentication probe.
    pub async fn connect(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(host)
            .credentials(username, password)
            .connect()
            .await
    }

    /// Returns a builder for connections that need a non-default port,
    /// timeout, or the factory-default credentials.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> SmartPlugBuilder {
        SmartPlugBuilder::new(host)
    }

    /// Returns the control endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Returns the authentication scheme resolved at construction.
    #[must_use]
    pub const fn auth_scheme(&self) -> AuthScheme {
        self.transport.auth_scheme()
    }

    /// Queries the current relay state.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::ProtocolError::UnexpectedState`] if the device
    /// answers with anything other than `ON` or `OFF`, and with the usual
    /// transport errors otherwise.
    pub async fn state(&self) -> Result<PowerState> {
        let body = self.transport.send(Command::GetState).await?;
        response::state_reply(&body).map_err(Error::from)
    }

    /// Sets the relay state.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::ProtocolError::SetupRejected`] if the device
    /// answers with anything other than `OK`.
    pub async fn set_state(&self, state: PowerState) -> Result<()> {
        let body = self.transport.send(Command::SetState(state)).await?;
        response::setup_reply(&body).map_err(Error::from)
    }

    /// Turns the relay on.
    ///
    /// # Errors
    ///
    /// See [`SmartPlug::set_state`].
    pub async fn turn_on(&self) -> Result<()> {
        self.set_state(PowerState::On).await
    }

    /// Turns the relay off.
    ///
    /// # Errors
    ///
    /// See [`SmartPlug::set_state`].
    pub async fn turn_off(&self) -> Result<()> {
        self.set_state(PowerState::Off).await
    }

    /// Reads the instantaneous power draw in watts (SP-2101W only).
    ///
    /// # Errors
    ///
    /// On hardware without metering the device answers with an empty or
    /// non-numeric value, which fails with a
    /// [`crate::ProtocolError`] rather than defaulting to zero.
    pub async fn now_power(&self) -> Result<f64> {
        self.metering(Command::GetNowPower).await
    }

    /// Reads today's cumulative energy usage in kWh (SP-2101W only).
    ///
    /// # Errors
    ///
    /// Same contract as [`SmartPlug::now_power`].
    pub async fn now_energy_day(&self) -> Result<f64> {
        self.metering(Command::GetNowEnergyDay).await
    }

    async fn metering(&self, command: Command) -> Result<f64> {
        // Both metering variants carry an attribute name.
        let reading = command.metering_attribute().unwrap_or("NowPower");
        let body = self.transport.send(command).await?;
        response::metering_reply(&body, reading).map_err(Error::from)
    }
}

/// Builder for [`SmartPlug`] connections.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use edimax_plug::SmartPlug;
///
/// # async fn example() -> edimax_plug::Result<()> {
/// let plug = SmartPlug::builder("172.16.100.75")
///     .credentials("admin", "secret")
///     .timeout(Duration::from_secs(3))
///     .connect()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SmartPlugBuilder {
    host: String,
    port: u16,
    credentials: Credentials,
    timeout: Duration,
}

impl SmartPlugBuilder {
    /// Creates a builder for the given host with the default port,
    /// timeout, and factory credentials.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            credentials: Credentials::factory_default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials::new(username, password);
        self
    }

    /// Sets a non-default control port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connects to the plug, probing its authentication scheme.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the device cannot be reached.
    pub async fn connect(self) -> Result<SmartPlug> {
        let transport =
            HttpTransport::connect(&self.host, self.port, self.credentials, self.timeout).await?;
        Ok(SmartPlug { transport })
    }
}
