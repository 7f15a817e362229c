use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// Parse error for sort directives.
#[derive(Debug, Clone, PartialEq)]
pub struct SortParseError(pub String);

impl std::fmt::Display for SortParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sort parse error: {}", self.0)
    }
}

impl std::error::Error for SortParseError {}

/// Parse a `field:direction,...` directive into sort keys, left-to-right
/// priority. `desc` sorts descending; any other (or missing) direction is
/// ascending. An empty field name is an error; an empty spec is no sort.
pub fn parse_sort(spec: &str) -> Result<Vec<Sort>, SortParseError> {
    if spec.is_empty() {
        return Ok(Vec::new());
    }
    spec.split(',')
        .map(|entry| {
            let (field, direction) = match entry.split_once(':') {
                Some((field, direction)) => (field.trim(), direction.trim()),
                None => (entry.trim(), ""),
            };
            if field.is_empty() {
                return Err(SortParseError(format!("empty sort field in '{spec}'")));
            }
            let direction = if direction == "desc" {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            Ok(Sort {
                field: field.to_string(),
                direction,
            })
        })
        .collect()
}
