//! Run-to-run export state
//!
//! Nothing is persisted besides the artifacts themselves: their modification
//! times ([`staleness`]) and `.failed` sentinel files ([`marker`]).

pub mod marker;
pub mod staleness;

pub use marker::{guarded_write, ArtifactGuard, Completion, GuardOutcome, MarkerScope};
pub use staleness::is_up_to_date;
