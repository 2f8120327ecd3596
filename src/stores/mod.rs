//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).

mod advice;
mod challenge;
mod ledger;
mod user;

pub mod sqlite;

pub use advice::{AdviceStore, AdviceTip};
pub use challenge::{ChallengeStore, ProgressUpdate};
pub use ledger::{AppendOutcome, LedgerStore, Snapshot};
pub use user::UserStore;
