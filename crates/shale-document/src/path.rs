use bson::{Bson, Document};

/// Split a dot-path into its segments, dropping empties from stray dots.
fn segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

/// Read the value at a dot-path.
///
/// An intermediate array fans out: the remaining path is tried against every
/// element in order and the first non-null match wins. A path that terminates
/// on an array returns the array wholesale.
pub fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    get_at(doc, &segments(path))
}

fn get_at<'a>(doc: &'a Document, segments: &[&str]) -> Option<&'a Bson> {
    let (head, rest) = segments.split_first()?;
    let value = doc.get(*head)?;
    if rest.is_empty() {
        return Some(value);
    }
    match value {
        Bson::Document(sub) => get_at(sub, rest),
        Bson::Array(elems) => elems.iter().find_map(|elem| match elem {
            Bson::Document(sub) => {
                get_at(sub, rest).filter(|found| !matches!(found, Bson::Null))
            }
            _ => None,
        }),
        _ => None,
    }
}

/// Write a value at a dot-path, creating missing intermediate documents.
///
/// Writes never fan out: an existing non-document intermediate (scalar or
/// array) leaves the document untouched, and the leaf is replaced wholesale,
/// arrays included. Reads fan into arrays, writes do not; alias renames
/// depend on that asymmetry.
pub fn set_path(doc: &mut Document, path: &str, value: Bson) {
    let segs = segments(path);
    let Some((leaf, intermediates)) = segs.split_last() else {
        return;
    };
    let mut current = doc;
    for seg in intermediates {
        if !current.contains_key(*seg) {
            current.insert(seg.to_string(), Document::new());
        }
        match current.get_mut(*seg) {
            Some(Bson::Document(sub)) => current = sub,
            _ => return,
        }
    }
    current.insert(leaf.to_string(), value);
}

/// Remove the value at a dot-path.
///
/// An intermediate array recurses into every element, so one unset strips a
/// field from a whole embedded collection. Missing segments are ignored.
pub fn unset_path(doc: &mut Document, path: &str) {
    unset_at(doc, &segments(path));
}

fn unset_at(doc: &mut Document, segments: &[&str]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        doc.remove(*head);
        return;
    }
    match doc.get_mut(*head) {
        Some(Bson::Document(sub)) => unset_at(sub, rest),
        Some(Bson::Array(elems)) => {
            for elem in elems {
                if let Bson::Document(sub) = elem {
                    unset_at(sub, rest);
                }
            }
        }
        _ => {}
    }
}

/// Rename a top-level field, replacing any existing value under the new name.
pub fn rename_field(doc: &mut Document, from: &str, to: &str) {
    if let Some(value) = doc.remove(from) {
        doc.insert(to.to_string(), value);
    }
}
