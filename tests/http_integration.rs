// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP/XML protocol using wiremock.

use std::time::Duration;

use edimax_plug::{AuthScheme, Error, PowerState, ProtocolError, SmartPlug};
use wiremock::matchers::{body_string_contains, header, header_exists, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATE_ON_REPLY: &str = "<SMARTPLUG id=\"edimax\"><CMD id=\"get\">\
    <Device.System.Power.State>ON</Device.System.Power.State></CMD></SMARTPLUG>";

const STATE_OFF_REPLY: &str = "<SMARTPLUG id=\"edimax\"><CMD id=\"get\">\
    <Device.System.Power.State>OFF</Device.System.Power.State></CMD></SMARTPLUG>";

const SETUP_OK_REPLY: &str = "<SMARTPLUG id=\"edimax\"><CMD id=\"setup\">OK</CMD></SMARTPLUG>";

const SETUP_FAILED_REPLY: &str =
    "<SMARTPLUG id=\"edimax\"><CMD id=\"setup\">FAILED</CMD></SMARTPLUG>";

const NOW_POWER_REPLY: &str = "<SMARTPLUG id=\"edimax\"><CMD id=\"get\"><NOW_POWER>\
    <Device.System.Power.NowPower>12.3</Device.System.Power.NowPower>\
    </NOW_POWER></CMD></SMARTPLUG>";

const NOW_ENERGY_DAY_REPLY: &str = "<SMARTPLUG id=\"edimax\"><CMD id=\"get\"><NOW_POWER>\
    <Device.System.Power.NowEnergy.Day>0.567</Device.System.Power.NowEnergy.Day>\
    </NOW_POWER></CMD></SMARTPLUG>";

const EMPTY_METERING_REPLY: &str = "<SMARTPLUG id=\"edimax\"><CMD id=\"get\">\
    <NOW_POWER></NOW_POWER></CMD></SMARTPLUG>";

/// Mounts the probe answer every device gives to the unauthenticated HEAD.
async fn mount_probe(server: &MockServer, challenge: &str) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(401).insert_header("www-authenticate", challenge))
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> SmartPlug {
    let address = server.address();
    SmartPlug::builder(address.ip().to_string())
        .port(address.port())
        .credentials("admin", "1234")
        .timeout(Duration::from_secs(5))
        .connect()
        .await
        .unwrap()
}

// ============================================================================
// Power state
// ============================================================================

mod power_state {
    use super::*;

    #[tokio::test]
    async fn query_state() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .and(body_string_contains("<CMD id=\"get\""))
            .respond_with(ResponseTemplate::new(200).set_body_string(STATE_ON_REPLY))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        assert_eq!(plug.state().await.unwrap(), PowerState::On);
    }

    #[tokio::test]
    async fn query_state_twice_is_stable() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(STATE_OFF_REPLY))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        let first = plug.state().await.unwrap();
        let second = plug.state().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, PowerState::Off);
    }

    #[tokio::test]
    async fn query_state_rejects_status_echo() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SETUP_OK_REPLY))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        let result = plug.state().await;
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::UnexpectedState(value))) if value == "OK"
        ));
    }

    #[tokio::test]
    async fn set_state_accepted() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .and(body_string_contains("<CMD id=\"setup\""))
            .and(body_string_contains(
                "<Device.System.Power.State>ON</Device.System.Power.State>",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(SETUP_OK_REPLY))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        plug.set_state(PowerState::On).await.unwrap();
    }

    #[tokio::test]
    async fn set_state_rejected() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SETUP_FAILED_REPLY))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        let result = plug.set_state(PowerState::Off).await;
        assert!(matches!(
            result,
            Err(Error::Protocol(ProtocolError::SetupRejected(value))) if value == "FAILED"
        ));
    }

    #[tokio::test]
    async fn turn_on_and_off_wrappers() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .and(body_string_contains("<CMD id=\"setup\""))
            .respond_with(ResponseTemplate::new(200).set_body_string(SETUP_OK_REPLY))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        plug.turn_on().await.unwrap();
        plug.turn_off().await.unwrap();
    }
}

// ============================================================================
// Metering
// ============================================================================

mod metering {
    use super::*;

    #[tokio::test]
    async fn now_power_reading() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .and(body_string_contains("<Device.System.Power.NowPower/>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NOW_POWER_REPLY))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        let watts = plug.now_power().await.unwrap();
        assert!((watts - 12.3).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn now_energy_day_reading() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .and(body_string_contains("<Device.System.Power.NowEnergy.Day/>"))
            .respond_with(ResponseTemplate::new(200).set_body_string(NOW_ENERGY_DAY_REPLY))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        let kwh = plug.now_energy_day().await.unwrap();
        assert!((kwh - 0.567).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_reading_is_an_error_not_zero() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_METERING_REPLY))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        let result = plug.now_power().await;
        assert!(matches!(result, Err(Error::Protocol(_))));
    }
}

// ============================================================================
// Authentication
// ============================================================================

mod authentication {
    use super::*;

    #[tokio::test]
    async fn basic_challenge_resolves_basic_and_sends_credentials() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        // base64("admin:1234")
        Mock::given(method("POST"))
            .and(header("authorization", "Basic YWRtaW46MTIzNA=="))
            .respond_with(ResponseTemplate::new(200).set_body_string(STATE_ON_REPLY))
            .expect(1)
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        assert_eq!(plug.auth_scheme(), AuthScheme::Basic);
        assert_eq!(plug.state().await.unwrap(), PowerState::On);
    }

    #[tokio::test]
    async fn digest_challenge_resolves_digest_and_answers_it() {
        let server = MockServer::start().await;
        let challenge = "Digest realm=\"smartplug\", nonce=\"dcd98b7102dd2f0e\", qop=\"auth\"";
        mount_probe(&server, challenge).await;

        // The answered POST carries an Authorization header; the opening
        // POST of the handshake does not and falls through to the 401.
        Mock::given(method("POST"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_string(STATE_ON_REPLY))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).insert_header("www-authenticate", challenge),
            )
            .expect(1)
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        assert_eq!(plug.auth_scheme(), AuthScheme::Digest);
        assert_eq!(plug.state().await.unwrap(), PowerState::On);

        let answered = server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|request| {
                request
                    .headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok().map(str::to_owned))
            })
            .next_back()
            .unwrap();
        assert!(answered.starts_with("Digest "));
        assert!(answered.contains("username=\"admin\""));
        assert!(answered.contains("uri=\"/smartplug.cgi\""));
    }

    #[tokio::test]
    async fn digest_scheme_persists_across_calls() {
        let server = MockServer::start().await;
        let challenge = "Digest realm=\"smartplug\", nonce=\"dcd98b7102dd2f0e\", qop=\"auth\"";
        mount_probe(&server, challenge).await;

        Mock::given(method("POST"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_string(STATE_OFF_REPLY))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(401).insert_header("www-authenticate", challenge),
            )
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        assert_eq!(plug.state().await.unwrap(), PowerState::Off);
        assert_eq!(plug.state().await.unwrap(), PowerState::Off);
        assert_eq!(plug.auth_scheme(), AuthScheme::Digest);
    }
}

// ============================================================================
// Error handling
// ============================================================================

mod error_handling {
    use super::*;

    #[tokio::test]
    async fn server_error_fails_every_accessor() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        assert!(matches!(plug.state().await, Err(Error::Transport(500))));
        assert!(matches!(
            plug.set_state(PowerState::On).await,
            Err(Error::Transport(500))
        ));
        assert!(matches!(plug.now_power().await, Err(Error::Transport(500))));
        assert!(matches!(
            plug.now_energy_day().await,
            Err(Error::Transport(500))
        ));
    }

    #[tokio::test]
    async fn malformed_reply_is_a_protocol_error() {
        let server = MockServer::start().await;
        mount_probe(&server, "Basic realm=\"smartplug\"").await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not xml at all"))
            .mount(&server)
            .await;

        let plug = connect(&server).await;
        assert!(matches!(plug.state().await, Err(Error::Protocol(_))));
    }

    #[tokio::test]
    async fn unreachable_host_fails_construction() {
        // A port that's definitely not listening.
        let result = SmartPlug::builder("127.0.0.1")
            .port(59999)
            .credentials("admin", "1234")
            .timeout(Duration::from_secs(1))
            .connect()
            .await;

        assert!(matches!(result, Err(Error::Connection(_))));
    }
}
