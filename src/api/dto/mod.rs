pub mod batch;
pub mod list_query;
pub mod search;
pub mod sort;

pub use batch::BatchRequest;
pub use list_query::{ListQuery, ListQueryParams};
pub use search::{Pagination, SearchInput, SearchInputWith};
pub use sort::{SortEntry, SortInput};
