use bson::Document;
use serde::{Deserialize, Serialize};

/// One page of results plus the paging totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub results: Vec<Document>,
    pub page: i64,
    pub limit: u64,
    pub total_pages: u64,
    pub total_results: u64,
}
