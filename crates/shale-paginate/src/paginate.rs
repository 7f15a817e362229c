use bson::{Bson, Document, doc};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use shale_document::{apply_alias, parse_alias, rename_field};
use shale_query::{FindQuery, Sort, SortDirection, parse_populate, parse_sort};
use shale_store::DocumentStore;

use crate::error::PaginateError;
use crate::options::PaginateOptions;
use crate::result::Page;

/// Sentinel page meaning "return every match, report it as one page".
pub const ALL_PAGES: i64 = -1;

/// Sort key remapped to the store's creation timestamp field.
const DATE_SORT_KEY: &str = "date";

const ID_FIELD: &str = "_id";
const PUBLIC_ID_FIELD: &str = "id";

/// Engine-level configuration.
#[derive(Debug, Clone)]
pub struct PaginateConfig {
    /// Page size when the request gives none, or a non-positive one.
    pub default_limit: u64,
    /// Store field holding the creation timestamp, targeted by the `date`
    /// sort key.
    pub created_field: String,
}

impl Default for PaginateConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            created_field: "created_at".to_string(),
        }
    }
}

/// The pagination entry point. Holds the configuration and the randomness
/// source used for shuffling, so tests can seed the permutation.
pub struct Paginator<R = StdRng> {
    config: PaginateConfig,
    rng: R,
}

impl Paginator<StdRng> {
    pub fn new() -> Self {
        Self::with_config(PaginateConfig::default())
    }

    pub fn with_config(config: PaginateConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for Paginator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Paginator<R> {
    /// Use an explicit randomness source.
    pub fn with_rng(config: PaginateConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Run one pagination request against the store and assemble the result
    /// envelope. Aggregation mode when `options.pipeline` is present, find
    /// mode otherwise. The count and fetch halves of either mode run
    /// concurrently; both must succeed.
    pub async fn paginate<S: DocumentStore>(
        &mut self,
        store: &S,
        filter: Document,
        options: &PaginateOptions,
    ) -> Result<Page, PaginateError> {
        let sort = self.request_sort(options)?;

        let page = match options.page {
            Some(ALL_PAGES) => ALL_PAGES,
            Some(page) if page >= 1 => page,
            _ => 1,
        };
        let per_page = options
            .limit
            .filter(|limit| *limit > 0)
            .map(|limit| limit as u64)
            .unwrap_or_else(|| self.config.default_limit.max(1));
        let (skip, limit) = if page == ALL_PAGES {
            (0, None)
        } else {
            ((page as u64 - 1) * per_page, Some(per_page))
        };

        let (mut results, total_results) = match &options.pipeline {
            Some(pipeline) => {
                self.run_aggregate(store, pipeline, &sort, skip, limit)
                    .await?
            }
            None => {
                self.run_find(store, filter, options, sort, skip, limit)
                    .await?
            }
        };

        if options.shuffle {
            results.shuffle(&mut self.rng);
        }
        let alias = options.alias.as_ref().map(parse_alias);
        for doc in &mut results {
            if let Some(rules) = &alias {
                apply_alias(doc, rules);
            }
            rename_field(doc, ID_FIELD, PUBLIC_ID_FIELD);
        }

        let (page, limit, total_pages) = if page == ALL_PAGES {
            (1, total_results, 1)
        } else {
            (page, per_page, total_results.div_ceil(per_page))
        };

        Ok(Page {
            results,
            page,
            limit,
            total_pages,
            total_results,
        })
    }

    /// Parse the request's sort directive, remapping the `date` key to the
    /// configured creation field. Rejects before any I/O happens.
    fn request_sort(&self, options: &PaginateOptions) -> Result<Vec<Sort>, PaginateError> {
        let Some(spec) = options.sort.as_deref() else {
            return Ok(Vec::new());
        };
        let mut sort = parse_sort(spec)?;
        for key in &mut sort {
            if key.field == DATE_SORT_KEY {
                key.field = self.config.created_field.clone();
            }
        }
        Ok(sort)
    }

    async fn run_find<S: DocumentStore>(
        &self,
        store: &S,
        filter: Document,
        options: &PaginateOptions,
        sort: Vec<Sort>,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<(Vec<Document>, u64), PaginateError> {
        let fields = options
            .fields
            .as_deref()
            .map(parse_fields)
            .filter(|fields| !fields.is_empty());
        let populate = options
            .populate
            .as_deref()
            .map(parse_populate)
            .unwrap_or_default();

        let query = FindQuery {
            filter,
            sort,
            skip,
            limit,
            fields,
            populate,
        };
        debug!(skip, ?limit, "dispatching find");
        let (total, results) = tokio::join!(store.count(&query.filter), store.find(&query));
        Ok((results?, total?))
    }

    async fn run_aggregate<S: DocumentStore>(
        &self,
        store: &S,
        pipeline: &[Document],
        sort: &[Sort],
        skip: u64,
        limit: Option<u64>,
    ) -> Result<(Vec<Document>, u64), PaginateError> {
        let mut data = pipeline.to_vec();
        if !sort.is_empty() {
            data.push(doc! { "$sort": sort_stage(sort) });
        }
        data.push(doc! { "$skip": skip as i64 });
        if let Some(limit) = limit {
            data.push(doc! { "$limit": limit as i64 });
        }
        debug!(stages = data.len(), "dispatching aggregation");
        let (results, total) =
            tokio::join!(store.aggregate(&data), store.aggregate_count(pipeline));
        Ok((results?, total?))
    }
}

fn parse_fields(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

fn sort_stage(sort: &[Sort]) -> Document {
    let mut stage = Document::new();
    for key in sort {
        let direction = match key.direction {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        };
        stage.insert(key.field.clone(), Bson::Int32(direction));
    }
    stage
}
