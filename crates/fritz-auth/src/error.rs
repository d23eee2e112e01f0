//! Authentication error types.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Challenge does not conform to the 5-field `$`-delimited format
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    /// Expected XML element absent from a gateway response
    #[error("missing field in gateway response: {0}")]
    MissingField(&'static str),

    /// `BlockTime` is not a non-negative integer
    #[error("invalid BlockTime: {0}")]
    InvalidBlockTime(String),

    /// Server-mandated cooldown exceeds the sanity cap
    #[error("server-mandated cooldown of {0}s exceeds the cap")]
    CooldownTooLong(u64),

    /// Challenge fetch step failed (transport or parse)
    #[error("failed to get challenge")]
    ChallengeFetch(#[source] Box<AuthError>),

    /// Response submit step failed (transport or parse)
    #[error("failed to login")]
    Login(#[source] Box<AuthError>),

    /// Gateway returned the all-zero session identifier
    #[error("wrong username or password")]
    InvalidCredentials,

    /// Invalid transition in the login FSM (driver bug)
    #[error("invalid login state transition: {0}")]
    InvalidStateTransition(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// XML parse error
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
