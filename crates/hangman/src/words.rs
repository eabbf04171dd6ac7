//! Static word lists, keyed by difficulty.

use crate::types::Difficulty;

const EASY: &[&str] = &[
    "CAT", "DOG", "SUN", "CAR", "RED", "BOY", "RUN", "EAT", "BIG", "HOT", "ICE", "TREE", "BOOK",
    "FISH", "BIRD", "LOVE", "BLUE", "FAST", "COLD", "WARM", "HAT", "BED", "CUP", "BAG", "TOY",
    "PEN", "EGG", "BOX", "KEY", "MAN",
];

const MEDIUM: &[&str] = &[
    "PYTHON", "COMPUTER", "KEYBOARD", "MONITOR", "INTERNET", "WEBSITE", "DATABASE", "FUNCTION",
    "VARIABLE", "OBJECT", "SCHOOL", "FRIEND", "FAMILY", "HAPPY", "STRONG", "BRIGHT", "QUIET",
    "NATURE", "MOUNTAIN", "OCEAN", "GUITAR", "PLANET", "CASTLE", "DRAGON", "FOREST", "BRIDGE",
    "ROCKET", "GARDEN",
];

const HARD: &[&str] = &[
    "JAVASCRIPT",
    "PROGRAMMING",
    "ALGORITHM",
    "FRAMEWORK",
    "DEVELOPMENT",
    "ARCHITECTURE",
    "OPTIMIZATION",
    "DEPLOYMENT",
    "CONFIGURATION",
    "AUTHENTICATION",
    "ENCRYPTION",
    "ABSTRACTION",
    "INHERITANCE",
    "POLYMORPHISM",
    "ENCAPSULATION",
    "ADVENTURE",
    "KNOWLEDGE",
    "CHALLENGE",
    "DISCOVERY",
    "UNIVERSE",
    "CREATIVE",
];

const EXPERT: &[&str] = &[
    "CRYPTOCURRENCY",
    "MICROSERVICES",
    "CONTAINERIZATION",
    "ORCHESTRATION",
    "VIRTUALIZATION",
    "PARALLELIZATION",
    "SYNCHRONIZATION",
    "MULTITHREADING",
    "ASYNCHRONOUS",
    "RESPONSIBILITY",
    "ACCOUNTABILITY",
    "SUSTAINABILITY",
    "IMPLEMENTATION",
    "TRANSFORMATION",
    "REVOLUTIONARY",
    "EXTRAORDINARY",
    "CONSTITUTIONAL",
    "INTERDISCIPLINARY",
    "INTERNATIONALLY",
    "CHARACTERIZATION",
];

/// The word catalog for a difficulty. Every entry is uppercase ASCII.
pub fn words_for(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Easy => EASY,
        Difficulty::Medium => MEDIUM,
        Difficulty::Hard => HARD,
        Difficulty::Expert => EXPERT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_are_uppercase_and_nonempty() {
        for d in Difficulty::ALL {
            let words = words_for(d);
            assert!(!words.is_empty(), "{d} has no words");
            for w in words {
                assert!(!w.is_empty());
                assert!(w.chars().all(|c| c.is_ascii_uppercase()), "{w} is not uppercase");
            }
        }
    }

    #[test]
    fn test_list_sizes() {
        assert_eq!(words_for(Difficulty::Easy).len(), 30);
        assert_eq!(words_for(Difficulty::Medium).len(), 28);
        assert_eq!(words_for(Difficulty::Hard).len(), 21);
        assert_eq!(words_for(Difficulty::Expert).len(), 20);
    }
}
