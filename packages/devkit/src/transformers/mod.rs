pub mod api;
pub mod diagnostics;
pub mod inline_assets;

pub use api::AstTransformer;
pub use diagnostics::{find_shape_mismatches, MismatchKind, ShapeMismatch};
pub use inline_assets::{inline_assets, InlineAssetsTransformer, NAME, VERSION};
