use once_cell::sync::Lazy;
use regex::Regex;

/// Interrogative and auxiliary words that mark a suggestion as a question
/// when they open it. Order matters: the query expander appends these to the
/// seed query in exactly this order.
pub const QUESTION_WORDS: [&str; 28] = [
    "how", "what", "why", "when", "where", "who", "which", "can", "is", "are", "do", "does", "did",
    "will", "should", "could", "would", "may", "might", "shall", "whose", "whom", "was", "were",
    "has", "have", "had", "am",
];

/// English function words matched as whole words anywhere in a suggestion.
pub const PREPOSITIONS: [&str; 50] = [
    "about",
    "above",
    "across",
    "after",
    "against",
    "along",
    "among",
    "around",
    "at",
    "before",
    "behind",
    "below",
    "beneath",
    "beside",
    "between",
    "beyond",
    "but",
    "by",
    "concerning",
    "despite",
    "down",
    "during",
    "except",
    "for",
    "from",
    "in",
    "inside",
    "into",
    "like",
    "near",
    "of",
    "off",
    "on",
    "onto",
    "out",
    "over",
    "past",
    "since",
    "through",
    "throughout",
    "to",
    "toward",
    "under",
    "until",
    "up",
    "upon",
    "versus",
    "with",
    "within",
    "without",
];

static PREPOSITION_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = PREPOSITIONS.join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("preposition pattern is static")
});

/// True if the suggestion opens with a question word followed by a space, or
/// ends with a question mark. Comparison is lowercased and trimmed.
pub fn is_question(s: &str) -> bool {
    let lowered = s.trim().to_lowercase();
    if lowered.ends_with('?') {
        return true;
    }
    QUESTION_WORDS.iter().any(|word| {
        lowered
            .strip_prefix(word)
            .is_some_and(|rest| rest.starts_with(' '))
    })
}

/// True if the suggestion contains any preposition as a whole word.
pub fn has_preposition(s: &str) -> bool {
    PREPOSITION_RE.is_match(s)
}

/// True if the suggestion, once trimmed, starts with `#`.
pub fn is_hashtag(s: &str) -> bool {
    s.trim().starts_with('#')
}

/// `"#"` + the lowercased suggestion with all whitespace removed. An empty
/// input yields a bare `"#"`, which is kept as-is.
pub fn generated_hashtag(s: &str) -> String {
    let compact: String = s.split_whitespace().collect();
    format!("#{}", compact.to_lowercase())
}

/// Equality key used for merge/dedup comparisons. Never stored.
pub fn normalize_for_dedup(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_by_leading_word() {
        assert!(is_question("How to cook rice"));
        assert!(is_question("  WHY is the sky blue"));
        assert!(!is_question("cook rice"));
    }

    #[test]
    fn question_by_trailing_mark() {
        assert!(is_question("Is this good?"));
        assert!(is_question("best rice cooker?"));
    }

    #[test]
    fn bare_question_word_is_not_a_question() {
        assert!(!is_question("how"));
        assert!(!is_question("however it goes"));
        assert!(!is_question(""));
    }

    #[test]
    fn preposition_whole_word_only() {
        assert!(has_preposition("information about cats"));
        assert!(has_preposition("Hidden BETWEEN the lines"));
        assert!(!has_preposition("abouttown"));
        assert!(!has_preposition(""));
    }

    #[test]
    fn hashtag_detection_trims() {
        assert!(is_hashtag("#fitness"));
        assert!(is_hashtag("  #fitness tips"));
        assert!(!is_hashtag("fitness #tips"));
    }

    #[test]
    fn generated_hashtag_transform() {
        assert_eq!(generated_hashtag("Best Fitness App"), "#bestfitnessapp");
        assert_eq!(generated_hashtag("  spaced   out  "), "#spacedout");
        assert_eq!(generated_hashtag(""), "#");
    }

    #[test]
    fn dedup_normalization() {
        assert_eq!(normalize_for_dedup("  Fitness App "), "fitness app");
        assert_eq!(
            normalize_for_dedup("fitness app"),
            normalize_for_dedup("FITNESS APP")
        );
    }
}
