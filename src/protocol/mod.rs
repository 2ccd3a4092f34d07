// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for talking to the plug.
//!
//! The device exposes a single control endpoint that accepts XML command
//! documents as multipart file-form POSTs, guarded by HTTP Basic or
//! Digest authentication. [`HttpTransport`] owns that exchange;
//! [`AuthScheme`] is resolved once, from the `WWW-Authenticate` challenge
//! the device returns to an unauthenticated probe, and never changes for
//! the lifetime of the transport.

mod http;

pub use http::{CONTROL_PATH, DEFAULT_PORT, DEFAULT_TIMEOUT, HttpTransport};

/// HTTP authentication credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the factory-default credentials (`admin`/`1234`) the
    /// device ships with.
    #[must_use]
    pub fn factory_default() -> Self {
        Self::new("admin", "1234")
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::factory_default()
    }
}

/// The HTTP authentication scheme the device demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// HTTP Basic authentication (the default).
    Basic,
    /// HTTP Digest authentication.
    Digest,
}

impl AuthScheme {
    /// Resolves the scheme from a `WWW-Authenticate` challenge value.
    ///
    /// A challenge beginning with the token `Digest` selects Digest;
    /// anything else, including an absent header, selects Basic.
    #[must_use]
    pub fn from_challenge(challenge: Option<&str>) -> Self {
        match challenge {
            Some(value) if value.starts_with("Digest") => Self::Digest,
            _ => Self::Basic,
        }
    }
}
