//! Vector index construction, search, and persistence
//!
//! The index is a flat store of fixed-dimension vectors searched by exact
//! brute-force scan. A built index travels together with the prompt
//! records it was built from: the vector at position `i` always belongs
//! to record `i`. The pair is persisted as two co-located artifacts that
//! are validated against each other on load.

pub mod builder;
pub mod snapshot;
pub mod vector;

pub use builder::IndexBuilder;
pub use snapshot::BuildManifest;
pub use snapshot::IndexPaths;
pub use snapshot::IndexSnapshot;
pub use vector::SearchHit;
pub use vector::VectorIndex;
