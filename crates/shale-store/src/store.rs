use bson::{Bson, Document, doc};
use shale_query::FindQuery;

use crate::error::StoreError;

/// Field name the engine's count pipeline writes its total under.
pub const COUNT_FIELD: &str = "total_results";

/// Abstract access to the persisted collection behind the engine.
///
/// Implementations own all I/O policy — timeouts, retries, connection
/// handling. Callers see results or the backend's error, unchanged.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Number of documents matching the filter.
    async fn count(&self, filter: &Document) -> Result<u64, StoreError>;

    /// Filtered, sorted, paginated fetch, with optional field selection and
    /// populate-plan expansion.
    async fn find(&self, query: &FindQuery) -> Result<Vec<Document>, StoreError>;

    /// Run an aggregation pipeline.
    async fn aggregate(&self, pipeline: &[Document]) -> Result<Vec<Document>, StoreError>;

    /// Run the pipeline with a trailing `$count` stage and read the total.
    /// An empty result means nothing matched: total zero.
    async fn aggregate_count(&self, pipeline: &[Document]) -> Result<u64, StoreError> {
        let mut counted = pipeline.to_vec();
        counted.push(doc! { "$count": COUNT_FIELD });
        let results = self.aggregate(&counted).await?;
        let total = results
            .first()
            .and_then(|doc| doc.get(COUNT_FIELD))
            .and_then(as_u64)
            .unwrap_or(0);
        Ok(total)
    }
}

pub(crate) fn as_u64(value: &Bson) -> Option<u64> {
    match value {
        Bson::Int32(n) => u64::try_from(*n).ok(),
        Bson::Int64(n) => u64::try_from(*n).ok(),
        Bson::Double(n) if *n >= 0.0 => Some(*n as u64),
        _ => None,
    }
}
