//! Authentication orchestrator.
//!
//! Sequences one full login attempt: fetch challenge, derive the
//! PBKDF2 response, honor the server-mandated cooldown, submit, and
//! validate the returned session identifier against the all-zero
//! failure sentinel. Every step drives the explicit login state
//! machine; no state is shared between attempts.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::challenge::derive_response;
use crate::client::LoginClient;
use crate::error::{AuthError, AuthResult};
use crate::login_fsm::{LoginInput, LoginMachine};

/// The session identifier the gateway returns when authentication
/// failed. Sixteen ASCII zeros; every other value is a valid session.
pub const INVALID_SID: &str = "0000000000000000";

/// Sanity cap on the server-mandated cooldown. The protocol leaves
/// `BlockTime` unbounded; anything above this is treated as fatal
/// rather than slept through.
pub const MAX_BLOCKTIME_SECS: u64 = 600;

/// An opaque session identifier issued by the gateway.
///
/// Valid identifiers are never inspected beyond the sentinel
/// comparison; they are carried as-is into subsequent requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw identifier as received from the gateway.
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the distinguished "authentication failed"
    /// value.
    pub fn is_sentinel(&self) -> bool {
        self.0 == INVALID_SID
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Runs the challenge-response login flow against one gateway.
#[derive(Clone)]
pub struct Authenticator {
    client: LoginClient,
}

impl Authenticator {
    /// Create an authenticator for a gateway base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: LoginClient::new(base_url),
        }
    }

    /// The underlying login client, for the logout call after the
    /// session has been used.
    pub fn client(&self) -> &LoginClient {
        &self.client
    }

    /// Perform one full login attempt and return a valid session
    /// identifier.
    ///
    /// Fetch and submit failures are wrapped as
    /// [`AuthError::ChallengeFetch`] and [`AuthError::Login`]; a
    /// malformed challenge propagates as-is since it indicates a
    /// protocol mismatch rather than bad credentials. The sentinel
    /// identifier maps to [`AuthError::InvalidCredentials`].
    pub async fn login(&self, username: &str, secret: &str) -> AuthResult<SessionId> {
        let mut fsm = LoginMachine::new();

        let state = match self.client.fetch_challenge().await {
            Ok(state) => state,
            Err(e) => {
                abort(&mut fsm);
                return Err(AuthError::ChallengeFetch(Box::new(e)));
            }
        };
        transition(&mut fsm, &LoginInput::ChallengeReceived)?;

        let response = match derive_response(&state.challenge, secret) {
            Ok(response) => response,
            Err(e) => {
                abort(&mut fsm);
                return Err(e);
            }
        };
        transition(&mut fsm, &LoginInput::ResponseDerived)?;

        if state.blocktime > MAX_BLOCKTIME_SECS {
            abort(&mut fsm);
            return Err(AuthError::CooldownTooLong(state.blocktime));
        }
        if state.blocktime > 0 {
            info!(
                seconds = state.blocktime,
                "waiting out server-mandated cooldown"
            );
            tokio::time::sleep(Duration::from_secs(state.blocktime)).await;
        }
        transition(&mut fsm, &LoginInput::CooldownElapsed)?;

        let sid = match self.client.submit_response(username, &response).await {
            Ok(sid) => sid,
            Err(e) => {
                abort(&mut fsm);
                return Err(AuthError::Login(Box::new(e)));
            }
        };
        transition(&mut fsm, &LoginInput::SidReceived)?;

        if sid.is_sentinel() {
            transition(&mut fsm, &LoginInput::SidRejected)?;
            warn!(username, "gateway rejected credentials");
            return Err(AuthError::InvalidCredentials);
        }
        transition(&mut fsm, &LoginInput::SidValid)?;

        info!(username, "login succeeded");
        Ok(sid)
    }
}

/// Advance the FSM, mapping a rejected input to a driver-bug error.
fn transition(fsm: &mut LoginMachine, input: &LoginInput) -> AuthResult<()> {
    fsm.consume(input).map_err(|_| {
        AuthError::InvalidStateTransition(format!(
            "cannot apply {:?} in state {:?}",
            input,
            fsm.state()
        ))
    })?;
    debug!(state = ?fsm.state(), "login state transition");
    Ok(())
}

/// Drop the FSM into its terminal failed state.
fn abort(fsm: &mut LoginMachine) {
    let _ = fsm.consume(&LoginInput::StepFailed);
}
