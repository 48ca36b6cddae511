//! Request handler module
//!
//! Maps incoming requests to files under the served root and renders them.

pub mod resolve;
pub mod router;

pub use router::handle_request;
