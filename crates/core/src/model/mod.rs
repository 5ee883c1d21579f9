mod ids;
mod roster;

pub use ids::ImageHandle;
pub use roster::{Roster, RosterEntry, RosterError};
