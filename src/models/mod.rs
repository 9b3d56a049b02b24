//! Data models for the pharmacy directory.

mod filters;
mod record;

pub use filters::SearchFilters;
pub use record::{CompositeKey, Record, COLUMNS, FIELD_COUNT};
