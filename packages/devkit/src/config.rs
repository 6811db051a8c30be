use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DevkitError, Result};
use crate::logging::LogLevel;
use crate::pipeline::PipelineOptions;

/// Default name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "devkit.json";

/// `devkit.json`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevkitConfig {
    /// Files or glob patterns to transform.
    pub include: Vec<String>,
    /// Output directory. Results are printed to stdout when unset.
    pub out_dir: Option<PathBuf>,
    /// Strip TypeScript syntax from the output.
    pub emit_js: bool,
    /// Fail on metadata the pass cannot inline instead of leaving it untouched.
    pub strict: bool,
    pub log_level: LogLevel,
}

impl DevkitConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DevkitError::io(path, e))?;
        Self::parse(&content, path)
    }

    /// Load `devkit.json` from `dir` if present.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        Self::load(&path).map(Some)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| DevkitError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            emit_js: self.emit_js,
            strict: self.strict,
        }
    }
}
