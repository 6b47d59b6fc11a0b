use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::classify::{generated_hashtag, has_preposition, is_hashtag, is_question};

/// The unit the pipeline produces and merges: one ordered sequence per
/// bucket, first-seen order meaningful, stored casing preserved.
///
/// Every bucket carries `#[serde(default)]` so a stored record with a
/// missing bucket deserializes as empty instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionBucketSet {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub prepositions: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub generated_hashtags: Vec<String>,
}

impl SuggestionBucketSet {
    /// Builds the five buckets from an already-deduplicated, ordered keyword
    /// list. Questions, prepositions, and hashtags are classified subsets of
    /// the keywords; generated hashtags are the transform of every keyword,
    /// exact-string deduplicated (the transform itself normalizes).
    pub fn classify(keywords: Vec<String>) -> Self {
        let questions = keywords
            .iter()
            .filter(|s| is_question(s))
            .cloned()
            .collect();
        let prepositions = keywords
            .iter()
            .filter(|s| has_preposition(s))
            .cloned()
            .collect();
        let hashtags = keywords.iter().filter(|s| is_hashtag(s)).cloned().collect();

        let mut seen = HashSet::new();
        let mut generated_hashtags = Vec::new();
        for keyword in &keywords {
            let tag = generated_hashtag(keyword);
            if seen.insert(tag.clone()) {
                generated_hashtags.push(tag);
            }
        }

        Self {
            keywords,
            questions,
            prepositions,
            hashtags,
            generated_hashtags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.questions.is_empty()
            && self.prepositions.is_empty()
            && self.hashtags.is_empty()
            && self.generated_hashtags.is_empty()
    }
}
