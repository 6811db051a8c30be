#![deny(clippy::all)]

//! Node.js entry points used by the test runner transformer.
//!
//! The JavaScript side calls `cacheKey` first and only asks for `transform` when it has
//! no cached output under that key.

use std::path::Path;

use napi::{Error, Result, Status};
use napi_derive::napi;
use ng_cute_devkit::transformers::inline_assets;
use ng_cute_devkit::{Pipeline, TransformCache};
use once_cell::sync::Lazy;

static PIPELINE: Lazy<Pipeline> = Lazy::new(Pipeline::default);
static CACHE: Lazy<TransformCache> = Lazy::new(TransformCache::new);

/// Rewrite `templateUrl`/`styleUrls` in `source` and return the printed code.
#[napi]
pub fn transform(filename: String, source: String) -> Result<String> {
    CACHE
        .get_or_transform(&PIPELINE, &source, Path::new(&filename))
        .map_err(|e| Error::new(Status::GenericFailure, e.to_string()))
}

/// Key the host can cache the output of `transform` under.
#[napi]
pub fn cache_key(filename: String, source: String) -> String {
    PIPELINE.cache_key(&source, Path::new(&filename))
}

#[napi]
pub fn transformer_name() -> String {
    inline_assets::NAME.to_string()
}

#[napi]
pub fn transformer_version() -> u32 {
    inline_assets::VERSION
}

/// Drop everything memoized by `transform`.
#[napi]
pub fn clear_cache() {
    CACHE.clear();
}
