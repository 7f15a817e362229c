use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use bson::{Bson, Document};
use shale_document::get_path;
use shale_query::{FindQuery, PopulateNode, Sort, SortDirection};

use crate::error::StoreError;
use crate::store::{DocumentStore, as_u64};

/// In-process reference backend.
///
/// Holds one primary collection plus named relation collections for
/// populate expansion (related documents are looked up by `_id`). Filtering
/// is equality-only, dot-paths allowed. The aggregation side understands
/// exactly the stages the pagination engine emits — `$match`, `$sort`,
/// `$skip`, `$limit`, `$count` — and reports anything else as unsupported.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Document>>,
    relations: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, doc: Document) {
        self.docs.write().unwrap().push(doc);
    }

    pub fn insert_many(&self, docs: impl IntoIterator<Item = Document>) {
        self.docs.write().unwrap().extend(docs);
    }

    /// Register the documents a relation field refers to. A populate plan
    /// node for that field replaces the stored reference value(s) with the
    /// matching documents.
    pub fn add_relation(&self, field: impl Into<String>, docs: Vec<Document>) {
        self.relations.write().unwrap().insert(field.into(), docs);
    }
}

impl DocumentStore for MemoryStore {
    async fn count(&self, filter: &Document) -> Result<u64, StoreError> {
        let docs = self.docs.read().unwrap();
        Ok(docs.iter().filter(|doc| matches(doc, filter)).count() as u64)
    }

    async fn find(&self, query: &FindQuery) -> Result<Vec<Document>, StoreError> {
        let mut results: Vec<Document> = {
            let docs = self.docs.read().unwrap();
            docs.iter()
                .filter(|doc| matches(doc, &query.filter))
                .cloned()
                .collect()
        };
        sort_docs(&mut results, &query.sort);
        let mut results = clip(results, query.skip, query.limit);

        let relations = self.relations.read().unwrap();
        for doc in &mut results {
            for node in &query.populate {
                populate(doc, node, &relations);
            }
        }
        if let Some(fields) = &query.fields {
            // Selection keeps populated relations alive alongside _id.
            let keep: Vec<&str> = query.populate.iter().map(|n| n.path.as_str()).collect();
            for doc in &mut results {
                *doc = select(doc, fields, &keep);
            }
        }
        Ok(results)
    }

    async fn aggregate(&self, pipeline: &[Document]) -> Result<Vec<Document>, StoreError> {
        let mut results: Vec<Document> = self.docs.read().unwrap().clone();
        for stage in pipeline {
            let Some((op, spec)) = stage.iter().next() else {
                continue;
            };
            match (op.as_str(), spec) {
                ("$match", Bson::Document(filter)) => {
                    results.retain(|doc| matches(doc, filter));
                }
                ("$sort", Bson::Document(spec)) => {
                    sort_docs(&mut results, &sort_spec(spec));
                }
                ("$skip", value) => {
                    let skip = stage_operand(op, value)?;
                    results = clip(results, skip, None);
                }
                ("$limit", value) => {
                    let limit = stage_operand(op, value)?;
                    results.truncate(limit as usize);
                }
                ("$count", Bson::String(name)) => {
                    // Mongo convention: counting an empty input emits nothing.
                    if results.is_empty() {
                        return Ok(Vec::new());
                    }
                    let mut counted = Document::new();
                    counted.insert(name.clone(), results.len() as i64);
                    return Ok(vec![counted]);
                }
                _ => return Err(StoreError::Unsupported(format!("stage {op}"))),
            }
        }
        Ok(results)
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(path, expected)| get_path(doc, path) == Some(expected))
}

fn sort_docs(docs: &mut [Document], sorts: &[Sort]) {
    if sorts.is_empty() {
        return;
    }
    docs.sort_by(|a, b| {
        for sort in sorts {
            let ord = compare(get_path(a, &sort.field), get_path(b, &sort.field));
            let ord = match sort.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

fn sort_spec(spec: &Document) -> Vec<Sort> {
    spec.iter()
        .map(|(field, direction)| Sort {
            field: field.clone(),
            direction: match direction {
                Bson::Int32(n) if *n < 0 => SortDirection::Desc,
                Bson::Int64(n) if *n < 0 => SortDirection::Desc,
                _ => SortDirection::Asc,
            },
        })
        .collect()
}

/// Cross-type ordering: absent sorts first, numbers compare numerically,
/// mixed types fall back to a fixed type rank.
fn compare(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (
                Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_),
                Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_),
            ) => number(a).partial_cmp(&number(b)).unwrap_or(Ordering::Equal),
            (Bson::String(a), Bson::String(b)) => a.cmp(b),
            (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
            (Bson::DateTime(a), Bson::DateTime(b)) => a.cmp(b),
            (a, b) => rank(a).cmp(&rank(b)),
        },
    }
}

fn number(value: &Bson) -> f64 {
    match value {
        Bson::Int32(n) => *n as f64,
        Bson::Int64(n) => *n as f64,
        Bson::Double(n) => *n,
        _ => 0.0,
    }
}

fn rank(value: &Bson) -> u8 {
    match value {
        Bson::Null => 0,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => 1,
        Bson::String(_) => 2,
        Bson::Boolean(_) => 3,
        Bson::DateTime(_) => 4,
        Bson::Document(_) => 5,
        Bson::Array(_) => 6,
        _ => 7,
    }
}

fn clip(docs: Vec<Document>, skip: u64, limit: Option<u64>) -> Vec<Document> {
    let start = (skip as usize).min(docs.len());
    let end = match limit {
        Some(limit) => (start + limit as usize).min(docs.len()),
        None => docs.len(),
    };
    docs[start..end].to_vec()
}

/// Keep `_id`, the selected fields, and any explicitly-kept keys.
fn select(doc: &Document, fields: &[String], keep: &[&str]) -> Document {
    let mut out = Document::new();
    for (key, value) in doc.iter() {
        let wanted =
            key == "_id" || fields.iter().any(|f| f == key) || keep.contains(&key.as_str());
        if wanted {
            out.insert(key.clone(), value.clone());
        }
    }
    out
}

fn populate(doc: &mut Document, node: &PopulateNode, relations: &HashMap<String, Vec<Document>>) {
    let Some(related) = relations.get(&node.path) else {
        return;
    };
    let Some(reference) = doc.get(&node.path).cloned() else {
        return;
    };
    let expanded = match reference {
        Bson::Array(ids) => Bson::Array(
            ids.iter()
                .filter_map(|id| expand(id, related, node, relations))
                .map(Bson::Document)
                .collect(),
        ),
        id => match expand(&id, related, node, relations) {
            Some(expanded) => Bson::Document(expanded),
            None => return,
        },
    };
    doc.insert(node.path.clone(), expanded);
}

fn expand(
    id: &Bson,
    related: &[Document],
    node: &PopulateNode,
    relations: &HashMap<String, Vec<Document>>,
) -> Option<Document> {
    let mut found = related.iter().find(|d| d.get("_id") == Some(id)).cloned()?;
    for child in &node.children {
        populate(&mut found, child, relations);
    }
    let keep: Vec<&str> = node.children.iter().map(|c| c.path.as_str()).collect();
    Some(select(&found, &node.fields, &keep))
}

fn stage_operand(op: &str, value: &Bson) -> Result<u64, StoreError> {
    as_u64(value).ok_or_else(|| StoreError::Unsupported(format!("{op} operand {value}")))
}
