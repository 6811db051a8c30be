//! Transform pipeline
//!
//! Host side of the transformers: parse a source file with OXC, run every registered
//! [`AstTransformer`] over it, optionally strip TypeScript syntax and print the result.
//! Output can be memoized with [`TransformCache`], keyed by the source, its path and
//! the `name@version` of every transformer.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_span::{ContentEq, SourceType};
use xxhash_rust::xxh3::Xxh3;

use crate::error::{DevkitError, Result};
use crate::transformers::{find_shape_mismatches, AstTransformer, InlineAssetsTransformer};

/// Pipeline options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Strip TypeScript syntax after the transformers ran.
    pub emit_js: bool,
    /// Refuse to transform files containing metadata that cannot be inlined.
    pub strict: bool,
}

/// Result of transforming one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    /// Formatted shape mismatches (`path:line:column: message`). Only informational
    /// unless strict mode is enabled.
    pub diagnostics: Vec<String>,
    /// Whether any transformer rewrote the tree. Stripping TypeScript syntax does not
    /// count.
    pub changed: bool,
}

pub struct Pipeline {
    transformers: Vec<Box<dyn AstTransformer>>,
    options: PipelineOptions,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}

impl Pipeline {
    /// Pipeline running the inline assets transformer.
    pub fn new(options: PipelineOptions) -> Self {
        let transformers: Vec<Box<dyn AstTransformer>> = vec![Box::new(InlineAssetsTransformer)];
        Self::with_transformers(transformers, options)
    }

    pub fn with_transformers(
        transformers: Vec<Box<dyn AstTransformer>>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            transformers,
            options,
        }
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    pub fn transformers(&self) -> impl Iterator<Item = &dyn AstTransformer> {
        self.transformers.iter().map(|t| &**t)
    }

    /// Key identifying the output of [`Pipeline::transform_source`] for these inputs.
    pub fn cache_key(&self, source: &str, path: &Path) -> String {
        let mut hasher = Xxh3::new();
        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update(&[0]);
        hasher.update(source.as_bytes());
        for transformer in &self.transformers {
            hasher.update(&[0]);
            hasher.update(transformer.cache_key().as_bytes());
        }
        hasher.update(&[self.options.emit_js as u8, self.options.strict as u8]);
        format!("{:032x}", hasher.digest128())
    }

    pub fn transform_file(&self, path: &Path) -> Result<TransformOutput> {
        let source = fs::read_to_string(path).map_err(|e| DevkitError::io(path, e))?;
        self.transform_source(&source, path)
    }

    pub fn transform_source(&self, source: &str, path: &Path) -> Result<TransformOutput> {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::ts());
        let parse_result = Parser::new(&allocator, source, source_type).parse();

        // Never rewrite a file the parser could not make sense of
        if !parse_result.errors.is_empty() {
            return Err(DevkitError::Parse {
                path: path.to_path_buf(),
                message: join_errors(&parse_result.errors),
            });
        }

        let display_path = path.to_string_lossy();
        let diagnostics: Vec<String> = find_shape_mismatches(&parse_result.program)
            .iter()
            .map(|mismatch| mismatch.format(&display_path, source))
            .collect();

        if self.options.strict && !diagnostics.is_empty() {
            return Err(DevkitError::ShapeMismatch {
                path: path.to_path_buf(),
                diagnostics,
            });
        }

        let mut program = parse_result.program;
        let mut changed = false;
        for transformer in &self.transformers {
            let transformed = transformer.transform(&allocator, &program);
            changed |= !transformed.content_eq(&program);
            program = transformed;
        }

        if self.options.emit_js {
            // Scoping has to be built on the transformed tree: the new nodes carry no
            // symbol or reference ids yet.
            let semantic = oxc_semantic::SemanticBuilder::new()
                .with_excess_capacity(0.0)
                .build(&program);

            let transform_options = oxc_transformer::TransformOptions::default();
            let transformer =
                oxc_transformer::Transformer::new(&allocator, path, &transform_options);
            let ret = transformer
                .build_with_scoping(semantic.semantic.into_scoping(), &mut program);
            if !ret.errors.is_empty() {
                return Err(DevkitError::Transform {
                    path: path.to_path_buf(),
                    message: join_errors(&ret.errors),
                });
            }
        }

        let code = Codegen::new().build(&program).code;
        Ok(TransformOutput {
            code,
            diagnostics,
            changed,
        })
    }
}

fn join_errors<E: ToString>(errors: &[E]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Memoized pipeline output, keyed by [`Pipeline::cache_key`].
#[derive(Default)]
pub struct TransformCache {
    entries: Mutex<HashMap<String, String>>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached code for these inputs, transforming and storing it on a miss.
    /// Failures are not cached.
    pub fn get_or_transform(
        &self,
        pipeline: &Pipeline,
        source: &str,
        path: &Path,
    ) -> Result<String> {
        let key = pipeline.cache_key(source, path);
        if let Some(code) = self.lock().get(&key) {
            return Ok(code.clone());
        }

        let output = pipeline.transform_source(source, path)?;
        self.lock().insert(key, output.code.clone());
        Ok(output.code)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
