//! Version
//!
//! Version information for the devkit.

use crate::transformers::inline_assets;

/// Devkit version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Devkit version string, including the identity of the inline assets pass.
pub fn version_string() -> String {
    format!(
        "ng-cute devkit v{} ({}@{})",
        VERSION,
        inline_assets::NAME,
        inline_assets::VERSION
    )
}
