//! PBKDF2 challenge-response login for FRITZ!Box gateways.
//!
//! This crate provides:
//! - Challenge wire-format parsing and the two-round PBKDF2 response
//!   derivation
//! - The `login_sid.lua` transport (challenge fetch, response submit,
//!   logout)
//! - An explicit FSM for the login flow
//! - The authentication orchestrator with sentinel-SID validation

mod challenge;
mod client;
mod error;
mod login_fsm;
mod session;
pub mod xml;

#[cfg(test)]
mod test_support;

pub use challenge::{derive_response, Challenge};
pub use client::{LoginClient, LoginState};
pub use error::{AuthError, AuthResult};
pub use login_fsm::{LoginInput, LoginMachine, LoginPhase};
pub use session::{Authenticator, SessionId, INVALID_SID, MAX_BLOCKTIME_SECS};
