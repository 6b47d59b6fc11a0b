use crate::bucket::SuggestionBucketSet;

/// Placeholder suggestion templates used when every upstream variant failed.
/// `{}` is replaced with the seed query.
const FALLBACK_TEMPLATES: [&str; 10] = [
    "{} guide",
    "{} tips",
    "{} tutorial",
    "{} ideas",
    "{} examples",
    "how to use {}",
    "what is {}",
    "best {}",
    "{} for beginners",
    "{} near me",
];

/// A fixed, query-templated bucket set substituted by the caller when the
/// upstream suggestion source is entirely unreachable. Runs through the
/// normal classification so the subset invariant holds.
pub fn fallback_bucket_set(seed: &str) -> SuggestionBucketSet {
    let keywords = FALLBACK_TEMPLATES
        .iter()
        .map(|template| template.replace("{}", seed))
        .collect();
    SuggestionBucketSet::classify(keywords)
}
