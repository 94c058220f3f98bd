//! Catalog module - published compositions and how buyers browse them.

mod category;
mod composition;
mod errors;
mod filter;

pub use category::{by_name, unknown_category, Category};
pub use composition::Composition;
pub use errors::CatalogError;
pub use filter::CompositionFilter;
