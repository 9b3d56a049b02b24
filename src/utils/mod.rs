//! Shared utility functions.

mod text;

pub use text::{clean, slug};
