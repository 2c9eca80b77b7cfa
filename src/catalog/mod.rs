pub mod product;
pub mod query;
pub mod store;

pub use product::{Product, ProductDraft, ProductInput};
pub use query::{PageSpec, ProductQuery, SortField, SortOrder};
pub use store::ProductStore;
