#![deny(clippy::all)]

/**
 * ng-cute devkit - Rust Implementation
 *
 * Build and test tooling for ng-cute components
 */
pub mod config;
pub mod error;
pub mod logging;
pub mod main_entry;
pub mod pipeline;
pub mod transformers;
pub mod version;

pub use error::{DevkitError, Result};
pub use pipeline::{Pipeline, PipelineOptions, TransformCache, TransformOutput};
pub use transformers::{inline_assets, AstTransformer, InlineAssetsTransformer};
