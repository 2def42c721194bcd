//! Phrase mutations for activity phrases that keep colliding

use crate::fallback::CategoryFallbackGenerator;

pub const ADVERBIAL_MODIFIERS: &[&str] = &[
    "secretly", "dramatically", "clumsily", "silently", "frantically", "gracefully", "sleepily",
    "proudly", "nervously", "enthusiastically", "reluctantly", "heroically", "sneakily",
    "angrily", "joyfully",
];

pub const LOCATION_PHRASES: &[&str] = &[
    "on the moon", "underwater", "on a tightrope", "in a crowded elevator", "at the north pole",
    "in a tiny closet", "on a rollercoaster", "in zero gravity", "during an earthquake",
    "inside a snow globe",
];

pub const TIME_PERIODS: &[&str] = &[
    "in the stone age", "in medieval times", "in the year 3000", "during the roaring twenties",
    "in the wild west", "during a blackout", "at midnight", "on the first day of school",
];

/// Mutated forms of `base`, in escalation order: a prepended modifier, then
/// an appended location, then an appended time period. Each group is
/// shuffled.
pub fn candidates(base: &str, fallback: &CategoryFallbackGenerator) -> Vec<String> {
    let base = base.trim();
    let mut out = Vec::new();
    out.extend(
        fallback
            .shuffled(ADVERBIAL_MODIFIERS)
            .into_iter()
            .map(|m| format!("{} {}", m, base)),
    );
    out.extend(
        fallback
            .shuffled(LOCATION_PHRASES)
            .into_iter()
            .map(|l| format!("{} {}", base, l)),
    );
    out.extend(
        fallback
            .shuffled(TIME_PERIODS)
            .into_iter()
            .map(|t| format!("{} {}", base, t)),
    );
    out
}

pub fn variation(base: &str, n: u64) -> String {
    format!("{} (variation {})", base.trim(), n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_escalate_in_order() {
        let fallback = CategoryFallbackGenerator::with_seed(1);
        let all = candidates("juggling", &fallback);
        let modifiers = ADVERBIAL_MODIFIERS.len();
        let locations = LOCATION_PHRASES.len();

        assert_eq!(all.len(), modifiers + locations + TIME_PERIODS.len());
        assert!(all[..modifiers].iter().all(|c| c.ends_with(" juggling")));
        assert!(all[modifiers..modifiers + locations]
            .iter()
            .all(|c| c.starts_with("juggling ") && LOCATION_PHRASES.iter().any(|l| c.ends_with(l))));
        assert!(all[modifiers + locations..]
            .iter()
            .all(|c| TIME_PERIODS.iter().any(|t| c.ends_with(t))));
    }

    #[test]
    fn test_variation_format() {
        assert_eq!(variation(" juggling ", 3), "juggling (variation 3)");
    }
}
