//! Serve single files from a non-public directory, inline or as downloads.
//!
//! [`render::FileResponder`] is the core: it classifies a file by extension
//! against an [`render::ExtensionCatalog`], resolves the Content-Type (from the
//! file signature for images), and builds the complete response. The remaining
//! modules form a small hyper server hosting it.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod render;
pub mod server;
