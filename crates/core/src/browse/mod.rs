//! Catalog browsing - the paging/filter/search state machine.
//!
//! A [`BrowseController`] owns one browse session: the accumulated pages,
//! the active genre and search filters, and the derived display slices.
//! It publishes a single observable [`BrowseUiState`] value.

mod controller;
mod types;

pub use controller::BrowseController;
pub use types::{BrowseSnapshot, BrowseUiState};
