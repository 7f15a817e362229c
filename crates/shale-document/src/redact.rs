use std::collections::BTreeMap;

use bson::Document;
use serde::{Deserialize, Serialize};

use crate::path::unset_path;

/// Per-field schema metadata, supplied externally. Only the privacy flag is
/// read here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    #[serde(default)]
    pub private: bool,
}

/// Field metadata for one document shape, keyed by dotted path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaMeta {
    fields: BTreeMap<String, FieldMeta>,
}

impl SchemaMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, meta: FieldMeta) {
        self.fields.insert(path.into(), meta);
    }

    /// Builder-style shorthand for flagging a path private.
    pub fn private(mut self, path: impl Into<String>) -> Self {
        self.insert(path, FieldMeta { private: true });
        self
    }

    pub fn private_paths(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, meta)| meta.private)
            .map(|(path, _)| path.as_str())
    }
}

/// Strip every private field from the document, at any depth. Fields inside
/// embedded arrays are stripped element-wise. Idempotent.
pub fn strip_private(doc: &mut Document, meta: &SchemaMeta) {
    for path in meta.private_paths() {
        unset_path(doc, path);
    }
}
