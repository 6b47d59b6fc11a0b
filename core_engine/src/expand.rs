use crate::classify::QUESTION_WORDS;

const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Suffix and category words appended to App Store seed queries.
const APP_STORE_SUFFIXES: [&str; 8] = [
    "app", "pro", "plus", "free", "premium", "offline", "2024", "2025",
];
const APP_STORE_PREFIXES: [&str; 3] = ["best", "free", "top"];
const APP_STORE_CATEGORIES: [&str; 8] = [
    "games",
    "fitness",
    "music",
    "photo",
    "education",
    "business",
    "social",
    "productivity",
];

const PLAY_STORE_SUFFIXES: [&str; 8] = [
    "app", "apk", "pro", "plus", "free", "premium", "2024", "2025",
];
const PLAY_STORE_PREFIXES: [&str; 3] = ["best", "free", "top"];
const PLAY_STORE_CATEGORIES: [&str; 8] = [
    "games",
    "tools",
    "launcher",
    "keyboard",
    "browser",
    "wallpaper",
    "cleaner",
    "vpn",
];

/// Produces the full variant-query sequence for one seed: the seed itself,
/// then `seed + letter` for a–z, then `seed + question-word` in
/// [`QUESTION_WORDS`] order. Always 55 entries, pure, restartable.
pub fn expand(seed: &str) -> Vec<String> {
    let mut variants = Vec::with_capacity(1 + ALPHABET.len() + QUESTION_WORDS.len());
    variants.push(seed.to_string());
    for letter in ALPHABET {
        variants.push(format!("{seed} {letter}"));
    }
    for word in QUESTION_WORDS {
        variants.push(format!("{seed} {word}"));
    }
    variants
}

fn static_variations(
    seed: &str,
    prefixes: &[&str],
    suffixes: &[&str],
    categories: &[&str],
) -> Vec<String> {
    let mut variations =
        Vec::with_capacity(prefixes.len() + suffixes.len() + categories.len());
    for prefix in prefixes {
        variations.push(format!("{prefix} {seed}"));
    }
    for suffix in suffixes {
        variations.push(format!("{seed} {suffix}"));
    }
    for category in categories {
        variations.push(format!("{seed} {category}"));
    }
    variations
}

/// Fixed App Store enrichment variations, unioned into the raw suggestion
/// pool alongside upstream results. No upstream calls involved.
pub fn app_store_variations(seed: &str) -> Vec<String> {
    static_variations(
        seed,
        &APP_STORE_PREFIXES,
        &APP_STORE_SUFFIXES,
        &APP_STORE_CATEGORIES,
    )
}

/// Fixed Play Store enrichment variations.
pub fn play_store_variations(seed: &str) -> Vec<String> {
    static_variations(
        seed,
        &PLAY_STORE_PREFIXES,
        &PLAY_STORE_SUFFIXES,
        &PLAY_STORE_CATEGORIES,
    )
}
