use serde::{Deserialize, Serialize};

/// One node of a populate plan: a relation to expand, the fields to project
/// on the related documents, and further relations to expand beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulateNode {
    pub path: String,
    pub fields: Vec<String>,
    pub children: Vec<PopulateNode>,
}

impl PopulateNode {
    fn leaf(path: &str, fields: &[String]) -> Self {
        Self {
            path: path.to_string(),
            fields: fields.to_vec(),
            children: Vec::new(),
        }
    }
}

/// Build a populate plan from a `;`-separated directive list.
///
/// Each directive is `path[:fields]` where `fields` is a comma-separated
/// projection, defaulting to `_id`. A dotted path (`a.b.c`) nests one node
/// per segment; a hyphenated path (`a-b,c`) expands the comma-separated
/// names as sibling children of the parent relation. Every node produced by
/// a directive carries that directive's projection list. Blank directives
/// are skipped. Whether the named relations exist is the store's problem,
/// not checked here.
pub fn parse_populate(spec: &str) -> Vec<PopulateNode> {
    spec.split(';').filter_map(parse_directive).collect()
}

fn parse_directive(raw: &str) -> Option<PopulateNode> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (path, fields) = match raw.split_once(':') {
        Some((path, list)) => (path.trim(), parse_fields(list)),
        None => (raw, Vec::new()),
    };
    if path.is_empty() {
        return None;
    }
    let fields = if fields.is_empty() {
        vec!["_id".to_string()]
    } else {
        fields
    };

    if let Some((parent, siblings)) = path.split_once('-') {
        let parent = parent.trim();
        if parent.is_empty() {
            return None;
        }
        let children = siblings
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| PopulateNode::leaf(name, &fields))
            .collect();
        return Some(PopulateNode {
            path: parent.to_string(),
            fields,
            children,
        });
    }

    // Dotted paths nest leaf-up: `a.b.c` becomes a → b → c.
    let mut node: Option<PopulateNode> = None;
    for segment in path.split('.').rev() {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let mut next = PopulateNode::leaf(segment, &fields);
        if let Some(child) = node.take() {
            next.children.push(child);
        }
        node = Some(next);
    }
    node
}

fn parse_fields(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_path_is_a_leaf_projecting_id() {
        let plan = parse_populate("owner");
        assert_eq!(
            plan,
            vec![PopulateNode {
                path: "owner".into(),
                fields: vec!["_id".into()],
                children: Vec::new(),
            }]
        );
    }

    #[test]
    fn explicit_fields_override_the_default() {
        let plan = parse_populate("owner:name,email");
        assert_eq!(plan[0].fields, vec!["name".to_string(), "email".to_string()]);
    }

    #[test]
    fn empty_field_list_falls_back_to_id() {
        let plan = parse_populate("owner:");
        assert_eq!(plan[0].fields, vec!["_id".to_string()]);
    }

    #[test]
    fn dotted_path_nests_one_node_per_segment() {
        let plan = parse_populate("owner.org.parent:name");
        assert_eq!(plan.len(), 1);
        let owner = &plan[0];
        assert_eq!(owner.path, "owner");
        assert_eq!(owner.fields, vec!["name".to_string()]);
        let org = &owner.children[0];
        assert_eq!(org.path, "org");
        assert_eq!(org.fields, vec!["name".to_string()]);
        let parent = &org.children[0];
        assert_eq!(parent.path, "parent");
        assert_eq!(parent.fields, vec!["name".to_string()]);
        assert!(parent.children.is_empty());
    }

    #[test]
    fn hyphenated_path_expands_siblings() {
        let plan = parse_populate("a-b,c:x,y");
        assert_eq!(plan.len(), 1);
        let parent = &plan[0];
        assert_eq!(parent.path, "a");
        assert_eq!(parent.fields, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(parent.children.len(), 2);
        assert_eq!(parent.children[0].path, "b");
        assert_eq!(parent.children[0].fields, vec!["x".to_string(), "y".to_string()]);
        assert!(parent.children[0].children.is_empty());
        assert_eq!(parent.children[1].path, "c");
        assert_eq!(parent.children[1].fields, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn multiple_directives_are_independent() {
        let plan = parse_populate("owner:name;tags");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].path, "owner");
        assert_eq!(plan[1].path, "tags");
        assert_eq!(plan[1].fields, vec!["_id".to_string()]);
    }

    #[test]
    fn blank_directives_are_skipped() {
        assert!(parse_populate("").is_empty());
        assert!(parse_populate(" ; ;").is_empty());
        assert_eq!(parse_populate("owner; ;tags").len(), 2);
    }
}
