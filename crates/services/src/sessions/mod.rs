mod machine;
mod workflow;

// Public API of the guess session subsystem.
pub use crate::error::SessionError;
pub use machine::{
    Completion, DropReason, FetchRequest, FetchTicket, GuessSession, LoadedImage, SessionPhase,
    SessionState, Slot,
};
pub use workflow::GuessLoopService;
