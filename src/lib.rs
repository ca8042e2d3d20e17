//! Docx Generation Service
//!
//! Accepts a JSON payload describing a student project (name, title, and a
//! nested content map of sections with free text and bullet lists) and returns
//! a generated .docx document.
//!
//! Pipeline: raw bytes -> `normalizer` -> `NormalizedRequest` -> `renderer`
//! -> docx bytes. The `api_server` module wires the pipeline to Axum; the
//! `sanitizer` strips markdown links and bare URLs from section text before it
//! enters the document.

pub mod api_server;
pub mod normalizer;
pub mod renderer;
pub mod sanitizer;

// Re-export commonly used items
pub use api_server::create_router;
pub use normalizer::{normalize, NormalizeError, NormalizedRequest, Section};
pub use renderer::{render, GeneratedDoc, RenderError, DOCX_MIME};
pub use sanitizer::sanitize;
