use bson::Document;
use serde::{Deserialize, Serialize};
use shale_document::AliasSpec;

/// Options for one pagination request. Constructed per call, consumed once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginateOptions {
    /// `field:direction,...` sort directive. The `date` key targets the
    /// store's creation timestamp field.
    pub sort: Option<String>,
    /// 1-based page number; `-1` returns every match as a single page.
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Comma-separated scalar field selection (find mode).
    pub fields: Option<String>,
    /// Populate directive list (find mode), see `shale_query::parse_populate`.
    pub populate: Option<String>,
    /// Alias rules applied to every returned document.
    pub alias: Option<AliasSpec>,
    /// Aggregation pipeline. Presence switches the request to aggregation
    /// mode; `fields` and `populate` no longer apply.
    pub pipeline: Option<Vec<Document>>,
    /// Shuffle the returned page in memory, after the fetch.
    #[serde(default)]
    pub shuffle: bool,
}
