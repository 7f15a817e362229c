mod alias;
mod path;
mod redact;

pub use alias::{AliasRule, AliasSpec, apply_alias, parse_alias};
pub use path::{get_path, rename_field, set_path, unset_path};
pub use redact::{FieldMeta, SchemaMeta, strip_private};

use bson::Document;

/// Reshape one document for output: strip private fields, then apply alias
/// rules. Privacy runs first so a rename can never resurrect a stripped
/// field. Takes the document by value — the caller hands over ownership for
/// the duration of the transform and gets the reshaped document back.
pub fn to_public(mut doc: Document, meta: &SchemaMeta, alias: Option<&AliasSpec>) -> Document {
    strip_private(&mut doc, meta);
    if let Some(spec) = alias {
        apply_alias(&mut doc, &parse_alias(spec));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn strips_then_aliases() {
        let meta = SchemaMeta::new().private("password");
        let alias = AliasSpec::Rules("profile.handle::handle".into());
        let doc = doc! {
            "password": "hunter2",
            "profile": { "handle": "@ada" },
        };
        let out = to_public(doc, &meta, Some(&alias));
        assert_eq!(out, doc! { "profile": {}, "handle": "@ada" });
    }

    #[test]
    fn alias_cannot_resurrect_a_private_field() {
        let meta = SchemaMeta::new().private("password");
        let alias = AliasSpec::Rules("password::leaked".into());
        let doc = doc! { "name": "ada", "password": "hunter2" };
        let out = to_public(doc, &meta, Some(&alias));
        assert_eq!(out, doc! { "name": "ada" });
    }

    #[test]
    fn no_alias_is_privacy_only() {
        let meta = SchemaMeta::new().private("secret");
        let out = to_public(doc! { "a": 1, "secret": 2 }, &meta, None);
        assert_eq!(out, doc! { "a": 1 });
    }
}
