//! File rendering
//!
//! Maps a single file to a response: inline for browser-renderable types,
//! attachment download for everything else.

pub mod catalog;
pub mod error;
pub mod responder;
pub mod sniff;
pub mod target;

pub use catalog::{CatalogEntry, ContentCategory, ExtensionCatalog};
pub use error::RenderError;
pub use responder::{FileResponder, RenderOptions};
pub use target::FileTarget;
