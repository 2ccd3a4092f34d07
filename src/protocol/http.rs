// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the smart plug control endpoint.

use std::time::Duration;

use digest_auth::{AuthContext, HttpMethod};
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};

use crate::command::Command;
use crate::error::{Error, ProtocolError};
use crate::protocol::{AuthScheme, Credentials};

/// Fixed control endpoint path on the device.
pub const CONTROL_PATH: &str = "/smartplug.cgi";

/// Default control port.
pub const DEFAULT_PORT: u16 = 10000;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport for a single device's control endpoint.
///
/// Each command is submitted as one multipart file-form POST carrying the
/// XML document, authenticated with the scheme resolved at connection
/// time. The transport is stateless between calls: no connection reuse
/// guarantees, no retries, no queueing.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    client: Client,
    credentials: Credentials,
    scheme: AuthScheme,
}

/// Authorization applied to a single POST.
enum Authorization<'a> {
    /// No credentials; used to draw a Digest challenge.
    None,
    /// HTTP Basic with the transport's credentials.
    Basic,
    /// A precomputed header value (Digest answer).
    Header(&'a str),
}

impl HttpTransport {
    /// Connects to the device and resolves its authentication scheme.
    ///
    /// Issues an unauthenticated HEAD probe to the control endpoint and
    /// inspects the `WWW-Authenticate` challenge. A probe that reaches
    /// the device succeeds regardless of HTTP status; the usual answer
    /// is a 401 carrying the challenge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the device cannot be reached.
    pub async fn connect(
        host: &str,
        port: u16,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let url = format!("http://{host}:{port}{CONTROL_PATH}");
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Connection)?;

        let probe = client.head(&url).send().await.map_err(Error::Connection)?;
        let challenge = probe
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok());
        let scheme = AuthScheme::from_challenge(challenge);

        tracing::debug!(url = %url, scheme = ?scheme, "resolved device authentication scheme");

        Ok(Self {
            url,
            client,
            credentials,
            scheme,
        })
    }

    /// Returns the control endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.url
    }

    /// Returns the authentication scheme resolved at connection time.
    #[must_use]
    pub const fn auth_scheme(&self) -> AuthScheme {
        self.scheme
    }

    /// Sends a command and returns the raw XML reply body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the request cannot be delivered,
    /// [`Error::Transport`] if the device answers with a non-success
    /// status, and [`Error::Protocol`] if a Digest challenge cannot be
    /// answered.
    pub async fn send(&self, command: Command) -> Result<String, Error> {
        let xml = command.to_xml();
        tracing::debug!(url = %self.url, %command, "sending command");

        let response = match self.scheme {
            AuthScheme::Basic => self.post(&xml, &Authorization::Basic).await?,
            AuthScheme::Digest => self.post_digest(&xml).await?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(status.as_u16()));
        }

        let body = response.text().await.map_err(Error::Connection)?;
        tracing::debug!(body = %body, "received reply");
        Ok(body)
    }

    async fn post(&self, xml: &str, auth: &Authorization<'_>) -> Result<Response, Error> {
        let form = Form::new().part("file", Part::text(xml.to_owned()).file_name("file"));
        let request = self.client.post(&self.url).multipart(form);
        let request = match auth {
            Authorization::None => request,
            Authorization::Basic => request.basic_auth(
                &self.credentials.username,
                Some(&self.credentials.password),
            ),
            Authorization::Header(value) => request.header(AUTHORIZATION, *value),
        };
        request.send().await.map_err(Error::Connection)
    }

    /// Digest handshake: the unauthenticated POST draws the challenge,
    /// the reissued POST carries the computed answer.
    async fn post_digest(&self, xml: &str) -> Result<Response, Error> {
        let first = self.post(xml, &Authorization::None).await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        let challenge = first
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let Some(challenge) = challenge else {
            // 401 without a challenge; surfaces as Transport(401).
            return Ok(first);
        };

        let answer = self.digest_answer(&challenge)?;
        self.post(xml, &Authorization::Header(&answer)).await
    }

    fn digest_answer(&self, challenge: &str) -> Result<String, Error> {
        let mut prompt = digest_auth::parse(challenge).map_err(ProtocolError::Challenge)?;
        let context = AuthContext::new_with_method(
            self.credentials.username.as_str(),
            self.credentials.password.as_str(),
            CONTROL_PATH,
            Option::<&[u8]>::None,
            HttpMethod::POST,
        );
        let answer = prompt.respond(&context).map_err(ProtocolError::Challenge)?;
        Ok(answer.to_header_string())
    }
}
