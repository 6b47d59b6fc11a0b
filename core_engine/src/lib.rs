pub mod bucket;
pub mod classify;
pub mod expand;
pub mod fallback;
pub mod merge;

pub use bucket::SuggestionBucketSet;
pub use merge::{merge, MergeAction, MergeResult, NewItemCounts};
