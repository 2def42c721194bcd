//! Recently surfaced words
//!
//! A small per-session cache handed to the generator as words to avoid. It is
//! a prompt hint only; the registry still decides what is used. Once it
//! reaches its limit it starts over so prompts stay bounded.

use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RecentWords {
    limit: usize,
    order: Vec<String>,
    seen: HashSet<String>,
}

impl RecentWords {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            order: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn push(&mut self, word: &str) {
        let word = word.trim().to_lowercase();
        if word.is_empty() || self.seen.contains(&word) {
            return;
        }
        if self.order.len() >= self.limit {
            debug!("Recent word cache reached {} entries, resetting", self.limit);
            self.order.clear();
            self.seen.clear();
        }
        self.seen.insert(word.clone());
        self.order.push(word);
    }

    /// Words in the order they were seen
    pub fn snapshot(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resets_at_limit() {
        let mut recent = RecentWords::new(3);
        for word in ["a", "b", "c"] {
            recent.push(word);
        }
        assert_eq!(recent.len(), 3);

        recent.push("d");
        assert_eq!(recent.snapshot(), vec!["d"]);
    }

    #[test]
    fn test_ignores_duplicates_and_case() {
        let mut recent = RecentWords::new(10);
        recent.push("Tiger");
        recent.push(" tiger ");
        assert_eq!(recent.len(), 1);
        assert_eq!(recent.snapshot(), vec!["tiger"]);
    }
}
