//! Two-party fair value exchange.
//!
//! One side commits to a secret value, the counterpart contributes its own
//! value, and the result is their sum modulo the range. The secret and key
//! are disclosed only after the contribution is accepted.

mod exchange;
mod mock;
mod state;
mod types;

pub use crate::range::Range;
pub use exchange::{Announcer, ContributionSource, Decision, FairValueProtocol, Reply};
pub use mock::{AnnouncerEvent, RecordingAnnouncer, ScriptedSource};
pub use state::{Committed, Contributed, RejectedContribution, Revealed};
pub use types::RunId;
