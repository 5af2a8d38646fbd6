//! HTTP surface for the gamedex catalog browser.
//!
//! Exposed as a library so integration tests can build the router
//! in-process with mock collaborators injected.

pub mod api;
pub mod state;

pub use api::create_router;
pub use state::AppState;
