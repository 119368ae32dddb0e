// Roadmap catalog, skill image stores, and the HTTP endpoints that
// hand a user's roadmap to the PDF renderer.

pub mod assets;
pub mod catalog;
pub mod filename;
pub mod handlers;

pub use assets::{AssetStore, FsAssetStore, S3AssetStore};
pub use catalog::RoadmapCatalog;
