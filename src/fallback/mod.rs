//! Fallback Module
//!
//! Offline vocabulary and the generator that draws from it.

pub mod categories;
pub mod generator;

pub use categories::{classify, infer_from_activity, is_generic_term, Category};
pub use generator::{CategoryFallbackGenerator, FallbackCandidate, Synthesized, SYNTH_ATTEMPTS};
