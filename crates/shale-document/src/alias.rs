use bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use crate::path::{get_path, set_path, unset_path};

/// Alias specification as callers supply it: either the compact rule string
/// (`"src::dest;base:f1,f2"`) or an ordered source → dest map. Map entries
/// are always full renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasSpec {
    Rules(String),
    Map(Document),
}

/// A single parsed alias rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasRule {
    /// `src::dest` — move the value at `source` to `dest`, deleting the
    /// source. Deep on both sides.
    Rename { source: String, dest: String },
    /// `base:f1,f2` — copy each `base.fN` up to a top-level key `fN`. An
    /// empty base reads the fields top-level.
    Lift { base: String, fields: Vec<String> },
}

/// Parse an alias spec into rules, in declaration order.
///
/// A rule with no delimiter, an empty source or dest, or an empty field list
/// is dropped — never an error.
pub fn parse_alias(spec: &AliasSpec) -> Vec<AliasRule> {
    match spec {
        AliasSpec::Rules(rules) => rules.split(';').filter_map(parse_rule).collect(),
        AliasSpec::Map(map) => map
            .iter()
            .filter_map(|(source, dest)| match dest {
                Bson::String(dest) if !source.is_empty() && !dest.is_empty() => {
                    Some(AliasRule::Rename {
                        source: source.clone(),
                        dest: dest.clone(),
                    })
                }
                _ => None,
            })
            .collect(),
    }
}

fn parse_rule(raw: &str) -> Option<AliasRule> {
    let raw = raw.trim();
    if let Some((source, dest)) = raw.split_once("::") {
        let (source, dest) = (source.trim(), dest.trim());
        if source.is_empty() || dest.is_empty() {
            return None;
        }
        return Some(AliasRule::Rename {
            source: source.to_string(),
            dest: dest.to_string(),
        });
    }
    let (base, list) = raw.split_once(':')?;
    let fields: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect();
    if fields.is_empty() {
        return None;
    }
    Some(AliasRule::Lift {
        base: base.trim().to_string(),
        fields,
    })
}

/// Apply parsed rules to a document, in order. When two rules target the
/// same destination, the last applied wins.
pub fn apply_alias(doc: &mut Document, rules: &[AliasRule]) {
    for rule in rules {
        match rule {
            AliasRule::Rename { source, dest } => {
                let Some(value) = get_path(doc, source).cloned() else {
                    continue;
                };
                unset_path(doc, source);
                set_path(doc, dest, value);
            }
            AliasRule::Lift { base, fields } => {
                for field in fields {
                    let source = if base.is_empty() {
                        field.clone()
                    } else {
                        format!("{base}.{field}")
                    };
                    let Some(value) = get_path(doc, &source).cloned() else {
                        continue;
                    };
                    doc.insert(field.clone(), value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn rules(spec: &str) -> Vec<AliasRule> {
        parse_alias(&AliasSpec::Rules(spec.to_string()))
    }

    // ── parsing ─────────────────────────────────────────────────

    #[test]
    fn parses_rename_rule() {
        assert_eq!(
            rules("a.b::c"),
            vec![AliasRule::Rename {
                source: "a.b".into(),
                dest: "c".into()
            }]
        );
    }

    #[test]
    fn parses_lift_rule() {
        assert_eq!(
            rules("owner:name,email"),
            vec![AliasRule::Lift {
                base: "owner".into(),
                fields: vec!["name".into(), "email".into()]
            }]
        );
    }

    #[test]
    fn lift_base_may_be_empty() {
        assert_eq!(
            rules(":name"),
            vec![AliasRule::Lift {
                base: String::new(),
                fields: vec!["name".into()]
            }]
        );
    }

    #[test]
    fn rule_without_delimiter_is_dropped() {
        assert!(rules("nodelimiter").is_empty());
    }

    #[test]
    fn blank_rules_are_dropped() {
        assert_eq!(rules("; ;a::b;").len(), 1);
    }

    #[test]
    fn map_form_is_always_rename() {
        let spec = AliasSpec::Map(doc! { "a.b": "c", "x": "y" });
        assert_eq!(
            parse_alias(&spec),
            vec![
                AliasRule::Rename {
                    source: "a.b".into(),
                    dest: "c".into()
                },
                AliasRule::Rename {
                    source: "x".into(),
                    dest: "y".into()
                },
            ]
        );
    }

    #[test]
    fn map_form_drops_non_string_dest() {
        let spec = AliasSpec::Map(doc! { "a": 1, "b": "c" });
        assert_eq!(parse_alias(&spec).len(), 1);
    }

    // ── rename semantics ────────────────────────────────────────

    #[test]
    fn rename_moves_scalar() {
        let mut doc = doc! { "a": { "b": 7 } };
        apply_alias(&mut doc, &rules("a.b::c"));
        assert_eq!(doc.get("c"), Some(&Bson::Int32(7)));
        assert_eq!(get_path(&doc, "a.b"), None);
    }

    #[test]
    fn rename_moves_array_value() {
        let mut doc = doc! { "a": { "tags": ["x", "y"] } };
        apply_alias(&mut doc, &rules("a.tags::labels"));
        assert_eq!(doc.get("labels"), Some(&Bson::Array(vec!["x".into(), "y".into()])));
        assert_eq!(get_path(&doc, "a.tags"), None);
    }

    #[test]
    fn rename_reads_through_embedded_arrays() {
        // get fans into the array, the delete strips every element, and the
        // write lands once at the destination.
        let mut doc = doc! { "items": [ { "sku": "x-1" }, { "sku": "x-2" } ] };
        apply_alias(&mut doc, &rules("items.sku::sku"));
        assert_eq!(doc.get("sku"), Some(&Bson::String("x-1".into())));
        assert_eq!(doc.get_array("items").unwrap().len(), 2);
        assert_eq!(get_path(&doc, "items.sku"), None);
    }

    #[test]
    fn rename_absent_source_is_no_op() {
        let original = doc! { "a": 1 };
        let mut doc = original.clone();
        apply_alias(&mut doc, &rules("missing::b"));
        assert_eq!(doc, original);
    }

    #[test]
    fn colliding_destinations_last_wins() {
        let mut doc = doc! { "a": 1, "b": 2 };
        apply_alias(&mut doc, &rules("a::out;b::out"));
        assert_eq!(doc.get("out"), Some(&Bson::Int32(2)));
        assert!(!doc.contains_key("a"));
        assert!(!doc.contains_key("b"));
    }

    // ── lift semantics ──────────────────────────────────────────

    #[test]
    fn lift_copies_to_top_level() {
        let mut doc = doc! { "owner": { "name": "ada", "email": "ada@io" } };
        apply_alias(&mut doc, &rules("owner:name,email"));
        assert_eq!(doc.get("name"), Some(&Bson::String("ada".into())));
        assert_eq!(doc.get("email"), Some(&Bson::String("ada@io".into())));
        // Copy, not move — the nested values stay put.
        assert_eq!(get_path(&doc, "owner.name"), Some(&Bson::String("ada".into())));
    }

    #[test]
    fn lift_skips_absent_fields() {
        let mut doc = doc! { "owner": { "name": "ada" } };
        apply_alias(&mut doc, &rules("owner:name,phone"));
        assert!(doc.contains_key("name"));
        assert!(!doc.contains_key("phone"));
    }

    #[test]
    fn lift_reads_through_arrays() {
        let mut doc = doc! { "members": [ { "role": "admin" }, { "role": "viewer" } ] };
        apply_alias(&mut doc, &rules("members:role"));
        assert_eq!(doc.get("role"), Some(&Bson::String("admin".into())));
    }
}
