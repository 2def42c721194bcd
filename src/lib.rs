//! Charades statement generator
//!
//! Produces charades prompts (an activity, the objects used in it, and an
//! absurd replacement for each) that never repeat a word the user has
//! already seen:
//! - Durable word registry (SQLite, JSON file or in-memory)
//! - Category-based offline fallback vocabulary
//! - Escalating uniqueness resolution ending in a guaranteed-unused phrase
//! - Optional LLM generator behind a trait

pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod registry;
pub mod resolver;
pub mod statement;
pub mod storage;
pub mod utils;

// Re-exports for convenience
pub use config::CharadesConfig;
pub use error::CharadesError;
pub use registry::WordRegistry;
pub use statement::{Statement, StatementGenerator};
