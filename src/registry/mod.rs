//! Registry Module
//!
//! The canonical record of every word and phrase ever shown to the user.

pub mod recent;
pub mod word;
pub mod word_registry;

pub use recent::RecentWords;
pub use word::{tokens, NormalizedWord, RegistryEntry, SubwordPolicy};
pub use word_registry::WordRegistry;
