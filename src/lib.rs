//! Farmacie - extraction of the Italian pharmacy directory.
//!
//! The directory (CercaFarmacie) renders its results with JavaScript and
//! paginates them through an unreliable "next page" control. The
//! [`extract`] engine reads each page, deduplicates the rows, and decides
//! whether the listing is complete from the on-page results counter.

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod output;
pub mod utils;
