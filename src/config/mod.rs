//! JSON-backed configuration for the library and the demo tool.
//!
//! - [`stem`]: algorithm tunables (`StemConfig`) and their per-page
//!   resolution into pixel parameters.
//! - [`demo`]: input/output description consumed by `stem_demo`.

pub mod demo;
pub mod stem;

pub use stem::{ArtificialStemPolicy, CheckerConfig, StemConfig, StemParams};
