mod error;
mod options;
mod paginate;
mod result;

pub use error::PaginateError;
pub use options::PaginateOptions;
pub use paginate::{ALL_PAGES, PaginateConfig, Paginator};
pub use result::Page;
