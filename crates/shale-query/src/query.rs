use bson::Document;
use serde::{Deserialize, Serialize};

use crate::populate::PopulateNode;
use crate::sort::Sort;

/// The filtered, sorted, paginated fetch handed to a document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindQuery {
    pub filter: Document,
    #[serde(default)]
    pub sort: Vec<Sort>,
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
    /// Scalar fields to select; `None` returns documents whole.
    pub fields: Option<Vec<String>>,
    #[serde(default)]
    pub populate: Vec<PopulateNode>,
}
