//! Group voting domain
//!
//! # Flow
//!
//! ```text
//! participant ──vote──▶ VotingSession ──(persisted)──▶ vote store
//!                                                         │
//!                 VoteCounts::tally ◀──── full re-scan ───┤
//!                 StageReadiness::evaluate ◀── flags ─────┘
//!                          │
//!                          └─ Complete { next } ──▶ trip stage advances
//! ```
//!
//! Everything here is pure; persistence and notifications live in the
//! application and infrastructure layers.

pub mod completion;
pub mod results;
pub mod session;
pub mod tally;
pub mod vote;

pub use completion::{ParticipantStatus, StageReadiness, has_voted_on_all};
pub use results::{ItemResult, StageResults};
pub use session::{PendingVote, VoteProgress, VotingSession};
pub use tally::{Tally, VoteCounts};
pub use vote::{Vote, VoteKey, VoteValue};
