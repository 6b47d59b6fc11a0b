use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::bucket::SuggestionBucketSet;
use crate::classify::normalize_for_dedup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeAction {
    Created,
    Merged,
}

/// Items appended to each bucket by one merge. For a `Created` result this
/// is every bucket's full length; for `Merged` it is the per-bucket delta.
/// Callers must branch on the action before interpreting the counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItemCounts {
    pub keywords: usize,
    pub questions: usize,
    pub prepositions: usize,
    pub hashtags: usize,
    pub generated_hashtags: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub action: MergeAction,
    pub bucket_set: SuggestionBucketSet,
    pub new_item_counts: NewItemCounts,
    pub total_merge_count: u64,
}

/// Unions a freshly aggregated bucket set into the previously stored one.
///
/// Existing items keep their position and casing; fresh items whose
/// trimmed-lowercased form is not already present are appended in fresh
/// order. With no existing record the fresh set is returned unchanged as a
/// `Created` result with a zero merge count.
pub fn merge(
    existing: Option<&SuggestionBucketSet>,
    fresh: SuggestionBucketSet,
    prior_merge_count: u64,
) -> MergeResult {
    let Some(existing) = existing else {
        let new_item_counts = NewItemCounts {
            keywords: fresh.keywords.len(),
            questions: fresh.questions.len(),
            prepositions: fresh.prepositions.len(),
            hashtags: fresh.hashtags.len(),
            generated_hashtags: fresh.generated_hashtags.len(),
        };
        return MergeResult {
            action: MergeAction::Created,
            bucket_set: fresh,
            new_item_counts,
            total_merge_count: 0,
        };
    };

    let (keywords, added_keywords) = merge_bucket(&existing.keywords, fresh.keywords);
    let (questions, added_questions) = merge_bucket(&existing.questions, fresh.questions);
    let (prepositions, added_prepositions) =
        merge_bucket(&existing.prepositions, fresh.prepositions);
    let (hashtags, added_hashtags) = merge_bucket(&existing.hashtags, fresh.hashtags);
    let (generated_hashtags, added_generated) =
        merge_bucket(&existing.generated_hashtags, fresh.generated_hashtags);

    MergeResult {
        action: MergeAction::Merged,
        bucket_set: SuggestionBucketSet {
            keywords,
            questions,
            prepositions,
            hashtags,
            generated_hashtags,
        },
        new_item_counts: NewItemCounts {
            keywords: added_keywords,
            questions: added_questions,
            prepositions: added_prepositions,
            hashtags: added_hashtags,
            generated_hashtags: added_generated,
        },
        total_merge_count: prior_merge_count + 1,
    }
}

fn merge_bucket(existing: &[String], fresh: Vec<String>) -> (Vec<String>, usize) {
    let normalized_existing: HashSet<String> =
        existing.iter().map(|s| normalize_for_dedup(s)).collect();

    let mut merged = existing.to_vec();
    let mut added = 0;
    for item in fresh {
        if !normalized_existing.contains(&normalize_for_dedup(&item)) {
            merged.push(item);
            added += 1;
        }
    }
    (merged, added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket_set(keywords: &[&str]) -> SuggestionBucketSet {
        SuggestionBucketSet::classify(keywords.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn create_path_reports_full_lengths() {
        let fresh = SuggestionBucketSet {
            keywords: vec!["a".to_string(), "b".to_string()],
            questions: Vec::new(),
            prepositions: Vec::new(),
            hashtags: Vec::new(),
            generated_hashtags: vec!["#a".to_string(), "#b".to_string()],
        };

        let result = merge(None, fresh.clone(), 0);
        assert_eq!(result.action, MergeAction::Created);
        assert_eq!(result.bucket_set, fresh);
        assert_eq!(result.new_item_counts.keywords, 2);
        assert_eq!(result.new_item_counts.generated_hashtags, 2);
        assert_eq!(result.new_item_counts.questions, 0);
        assert_eq!(result.total_merge_count, 0);
    }

    #[test]
    fn merge_drops_case_insensitive_duplicates() {
        let existing = SuggestionBucketSet {
            keywords: vec!["Fitness App".to_string()],
            ..Default::default()
        };
        let fresh = SuggestionBucketSet {
            keywords: vec!["fitness app".to_string(), "Fitness Tracker".to_string()],
            ..Default::default()
        };

        let result = merge(Some(&existing), fresh, 3);
        assert_eq!(result.action, MergeAction::Merged);
        assert_eq!(
            result.bucket_set.keywords,
            vec!["Fitness App", "Fitness Tracker"]
        );
        assert_eq!(result.new_item_counts.keywords, 1);
        assert_eq!(result.total_merge_count, 4);
    }

    #[test]
    fn merge_appends_in_fresh_order_after_existing() {
        let existing = SuggestionBucketSet {
            keywords: vec!["alpha".to_string(), "beta".to_string()],
            ..Default::default()
        };
        let fresh = SuggestionBucketSet {
            keywords: vec![
                "gamma".to_string(),
                "ALPHA".to_string(),
                "delta".to_string(),
            ],
            ..Default::default()
        };

        let result = merge(Some(&existing), fresh, 0);
        assert_eq!(
            result.bucket_set.keywords,
            vec!["alpha", "beta", "gamma", "delta"]
        );
        assert_eq!(result.new_item_counts.keywords, 2);
    }

    #[test]
    fn remerge_adds_nothing() {
        let fresh = bucket_set(&[
            "fitness tracker",
            "how to start fitness",
            "fitness for beginners",
            "#fitnessmotivation",
        ]);

        let first = merge(None, fresh.clone(), 0);
        let second = merge(Some(&first.bucket_set), fresh, first.total_merge_count);

        assert_eq!(second.action, MergeAction::Merged);
        assert_eq!(second.new_item_counts, NewItemCounts::default());
        assert_eq!(second.bucket_set, first.bucket_set);
        assert_eq!(second.total_merge_count, 1);
    }

    #[test]
    fn merge_against_partially_empty_record() {
        let existing = SuggestionBucketSet::default();
        let fresh = bucket_set(&["yoga mat", "yoga for beginners"]);

        let result = merge(Some(&existing), fresh.clone(), 0);
        assert_eq!(result.bucket_set, fresh);
        assert_eq!(result.new_item_counts.keywords, 2);
        assert_eq!(result.total_merge_count, 1);
    }
}
