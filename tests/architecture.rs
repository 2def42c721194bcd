//! Architecture Verification Suite
//!
//! Shared components must be usable across tasks, and every storage and
//! generation seam must stay a trait object.

#[cfg(test)]
mod architecture_tests {
    use charades::generator::{LLMProvider, PhraseGenerator};
    use charades::resolver::{CandidateProposer, Ladder, Strategy};
    use charades::storage::WordStore;
    use std::sync::Arc;

    // 1. Shared state must be Send + Sync
    #[test]
    fn test_shared_components_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<charades::WordRegistry>();
        assert_send_sync::<charades::StatementGenerator>();
        assert_send_sync::<charades::resolver::UniqueCandidateResolver>();
        assert_send_sync::<charades::fallback::CategoryFallbackGenerator>();
        assert_send_sync::<charades::storage::SqliteWordStore>();
        assert_send_sync::<charades::storage::JsonWordStore>();
        assert_send_sync::<charades::storage::InMemoryWordStore>();
        assert_send_sync::<charades::storage::KeyValueStore>();
        assert_send_sync::<charades::generator::OpenAICompatibleProvider>();
        assert_send_sync::<charades::generator::LlmPhraseGenerator>();
    }

    // 2. Seams are object safe
    #[test]
    fn test_traits_are_object_safe() {
        #[allow(dead_code)]
        fn takes_store(_: Arc<dyn WordStore>) {}
        #[allow(dead_code)]
        fn takes_generator(_: Arc<dyn PhraseGenerator>) {}
        #[allow(dead_code)]
        fn takes_provider(_: Arc<dyn LLMProvider>) {}
        #[allow(dead_code)]
        fn takes_proposer(_: Box<dyn CandidateProposer>) {}
    }

    // 3. Proposers move between tasks
    #[test]
    fn test_proposers_are_send() {
        fn assert_send<T: Send>() {}

        assert_send::<charades::resolver::ActivityProposer>();
        assert_send::<charades::resolver::ComponentProposer>();
        assert_send::<charades::resolver::SeedProposer>();
        assert_send::<Box<dyn CandidateProposer>>();
    }

    // 4. Every built-in ladder terminates
    #[test]
    fn test_builtin_ladders_terminate() {
        for ladder in [Ladder::activity(), Ladder::component(), Ladder::replacement()] {
            assert_eq!(ladder.steps().last(), Some(&Strategy::TerminalSuffix));
        }
        // Only activity phrases are mutated.
        assert!(Ladder::activity().steps().contains(&Strategy::Mutation));
        assert!(!Ladder::component().steps().contains(&Strategy::Mutation));
        assert!(!Ladder::replacement().steps().contains(&Strategy::Mutation));
    }
}
