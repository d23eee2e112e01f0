//! Login state machine using rust-fsm.
//!
//! The login flow is linear with no back-edges; every step can fail
//! into the terminal `Failed` state. Declaring it explicitly keeps the
//! orchestrator honest about ordering (in particular, the cooldown is
//! a real step between deriving and submitting, not a hidden sleep).
//!
//! ## State diagram
//!
//! ```text
//! Start
//!   | ChallengeReceived
//!   v
//! ChallengeFetched
//!   | ResponseDerived
//!   v
//! ResponseReady
//!   | CooldownElapsed        (consumed even for a zero-second wait)
//!   v
//! ReadyToSubmit
//!   | SidReceived
//!   v
//! Submitted ---SidValid---> Done
//!   | SidRejected
//!   v
//! Failed   (also reachable via StepFailed from every earlier state)
//! ```

use rust_fsm::*;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub login_flow(Start)

    Start => {
        ChallengeReceived => ChallengeFetched,
        StepFailed => Failed
    },
    ChallengeFetched => {
        ResponseDerived => ResponseReady,
        StepFailed => Failed
    },
    ResponseReady => {
        CooldownElapsed => ReadyToSubmit,
        StepFailed => Failed
    },
    ReadyToSubmit => {
        SidReceived => Submitted,
        StepFailed => Failed
    },
    Submitted => {
        SidValid => Done,
        SidRejected => Failed
    }
}

// Re-export the generated types with clearer names
pub use login_flow::Input as LoginInput;
pub use login_flow::State as LoginPhase;
pub use login_flow::StateMachine as LoginMachine;
