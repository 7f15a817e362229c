mod populate;
mod query;
mod sort;

pub use populate::{PopulateNode, parse_populate};
pub use query::FindQuery;
pub use sort::{Sort, SortDirection, SortParseError, parse_sort};
