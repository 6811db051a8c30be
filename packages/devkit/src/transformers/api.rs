// Transformers API
//
// Public API for source transformers run by the devkit pipeline.

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;

/// A syntax-tree pass with a stable identity.
///
/// Hosts cache transformed output by `(name, version)`, so an implementation must bump
/// its version whenever its output can change for the same input.
pub trait AstTransformer: Send + Sync {
    /// Stable pass name.
    fn name(&self) -> &'static str;

    /// Pass version.
    fn version(&self) -> u32;

    /// Produce a new tree in `allocator` without modifying `program`.
    fn transform<'a>(&self, allocator: &'a Allocator, program: &Program<'a>) -> Program<'a>;

    /// `name@version`, the identity a host keys cached output by.
    fn cache_key(&self) -> String {
        format!("{}@{}", self.name(), self.version())
    }
}
