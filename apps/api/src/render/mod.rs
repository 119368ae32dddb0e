// Roadmap PDF rendering.
// Pure, synchronous, request-scoped: no I/O besides the bytes handed in by the resolver.
// CPU-bound generation must run inside tokio::task::spawn_blocking.

pub mod builder;
pub mod font_metrics;
pub mod geometry;
pub mod raster;

// Re-export the public API consumed by the roadmap handlers.
pub use builder::{generate_roadmap_document, DocumentGenerationError};
