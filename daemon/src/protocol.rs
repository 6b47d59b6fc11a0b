use keyscout_core::{MergeAction, NewItemCounts, SuggestionBucketSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub body: RequestBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBody {
    Search(SearchRequest),
    Like(LikeRequest),
    Ping,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseBody {
    Search(SearchResponse),
    Like(LikeResponse),
    Pong,
    Error(ErrorResponse),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
    Timeout,
    Internal,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Google,
    Youtube,
    Bing,
    Appstore,
    Playstore,
}

/// Record-key discriminator carried over from the dashboard's search tabs.
/// It namespaces stored records; it does not change the expansion path.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Keywords,
    Hashtags,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub search_type: SearchType,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub country: String,
}

impl SearchRequest {
    /// Fills empty locale fields with defaults. The query keeps its casing:
    /// record identity is case-sensitive on the query string.
    pub fn normalized(mut self) -> Self {
        if self.language.trim().is_empty() {
            self.language = default_language();
        }
        if self.country.trim().is_empty() {
            self.country = default_country();
        }
        self
    }
}

pub fn default_language() -> String {
    "en".to_string()
}

pub fn default_country() -> String {
    "us".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeRequest {
    pub query: String,
    #[serde(default)]
    pub platform: Platform,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub action: MergeAction,
    #[serde(flatten)]
    pub buckets: SuggestionBucketSet,
    pub new_item_counts: NewItemCounts,
    pub total_merge_count: u64,
    pub is_fallback: bool,
    pub elapsed_ms: u64,
}
