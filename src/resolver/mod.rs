//! Resolver Module
//!
//! Turns proposals into values that have never been shown before, escalating
//! through fallback vocabulary, mutation and a terminal suffix as needed.

pub mod ladder;
pub mod mutation;
pub mod proposer;
pub mod unique;

pub use ladder::{EscalationLevel, GenerationAttemptState, Ladder, Strategy};
pub use proposer::{ActivityProposer, CandidateProposer, ComponentProposer, SeedProposer};
pub use unique::{Resolved, Slot, SlotKind, UniqueCandidateResolver, Verdict};
