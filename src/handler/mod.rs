//! Request handler module
//!
//! Route dispatch plus the wiki's view, edit and save handlers.

pub mod router;
pub mod wiki;

// Re-export main entry point
pub use router::handle_request;
