// Main Entry Point
//
// Command line driver for the inline assets transform: resolves the configuration,
// expands the input patterns and rewrites every file in parallel.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use rayon::prelude::*;

use crate::config::DevkitConfig;
use crate::error::{DevkitError, Result};
use crate::logging::{ConsoleLogger, LogLevel, Logger};
use crate::pipeline::{Pipeline, PipelineOptions, TransformOutput};
use crate::transformers::inline_assets;
use crate::version::version_string;

/// Options after merging `devkit.json` with the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub inputs: Vec<String>,
    pub out_dir: Option<PathBuf>,
    pub pipeline: PipelineOptions,
    pub log_level: LogLevel,
}

/// Outcome of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub transformed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

pub fn command() -> Command {
    Command::new("inline-assets")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inline component templateUrl/styleUrls as require() calls")
        .arg(
            Arg::new("inputs")
                .value_name("FILES")
                .num_args(0..)
                .help("Source files or glob patterns"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to devkit.json"),
        )
        .arg(
            Arg::new("out-dir")
                .short('o')
                .long("out-dir")
                .value_name("DIR")
                .help("Write results here instead of stdout"),
        )
        .arg(
            Arg::new("emit-js")
                .long("emit-js")
                .action(ArgAction::SetTrue)
                .help("Strip TypeScript syntax from the output"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail on templateUrl/styleUrls values that cannot be inlined"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .help("Log every file"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only log errors"),
        )
        .arg(
            Arg::new("print-key")
                .long("print-key")
                .action(ArgAction::SetTrue)
                .help("Print the transformer name@version and exit"),
        )
}

/// Merge the parsed arguments over `config`. Flags only ever switch options on; inputs
/// and the output directory given on the command line replace the configured ones.
pub fn resolve_options(matches: &ArgMatches, config: DevkitConfig) -> ResolvedOptions {
    let inputs: Vec<String> = matches
        .get_many::<String>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let mut pipeline = config.pipeline_options();
    pipeline.emit_js |= matches.get_flag("emit-js");
    pipeline.strict |= matches.get_flag("strict");

    let log_level = if matches.get_flag("verbose") {
        LogLevel::Debug
    } else if matches.get_flag("quiet") {
        LogLevel::Error
    } else {
        config.log_level
    };

    ResolvedOptions {
        inputs: if inputs.is_empty() { config.include } else { inputs },
        out_dir: matches
            .get_one::<String>("out-dir")
            .map(PathBuf::from)
            .or(config.out_dir),
        pipeline,
        log_level,
    }
}

/// Load the configuration named by `--config`, or `devkit.json` in `cwd` if present.
pub fn load_config(matches: &ArgMatches, cwd: &Path) -> Result<DevkitConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => DevkitConfig::load(Path::new(path)),
        None => Ok(DevkitConfig::discover(cwd)?.unwrap_or_default()),
    }
}

/// Expand glob patterns; plain paths are kept as they are. Duplicates are removed,
/// first occurrence wins.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        if !is_glob(pattern) {
            files.push(PathBuf::from(pattern));
            continue;
        }

        let paths = glob::glob(pattern).map_err(|e| DevkitError::Glob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        for entry in paths {
            let path =
                entry.map_err(|e| DevkitError::io(e.path().to_path_buf(), e.into()))?;
            if path.is_file() {
                files.push(path);
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|path| seen.insert(path.clone()));
    Ok(files)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(|c: char| matches!(c, '*' | '?' | '['))
}

/// Where the output for `input` goes below `out_dir`.
pub fn output_path(out_dir: &Path, input: &Path, emit_js: bool) -> PathBuf {
    let relative: PathBuf = if input.is_absolute() {
        input.file_name().map(PathBuf::from).unwrap_or_default()
    } else {
        input
            .components()
            .filter(|c| matches!(c, std::path::Component::Normal(_)))
            .collect()
    };

    let mut path = out_dir.join(relative);
    if emit_js {
        path.set_extension("js");
    }
    path
}

/// Transform every input, writing to `out_dir` or stdout.
pub fn run(options: &ResolvedOptions, logger: &dyn Logger) -> RunSummary {
    let files = match expand_inputs(&options.inputs) {
        Ok(files) => files,
        Err(e) => {
            logger.error(&e.to_string());
            return RunSummary {
                transformed: 0,
                failed: 1,
            };
        }
    };

    if files.is_empty() {
        logger.warn("No input files");
        return RunSummary::default();
    }

    logger.debug(&format!(
        "Transforming {} files with {}@{}",
        files.len(),
        inline_assets::NAME,
        inline_assets::VERSION
    ));

    let pipeline = Pipeline::new(options.pipeline);
    let results: Vec<(PathBuf, Result<TransformOutput>)> = files
        .par_iter()
        .map(|file| (file.clone(), pipeline.transform_file(file)))
        .collect();

    let mut summary = RunSummary::default();
    for (file, result) in results {
        let written = result.and_then(|output| {
            for diagnostic in &output.diagnostics {
                logger.warn(diagnostic);
            }
            if output.changed {
                logger.info(&format!("Inlined assets in {}", file.display()));
            } else {
                logger.debug(&format!("No assets to inline in {}", file.display()));
            }
            emit(options, &file, &output.code, logger)
        });
        match written {
            Ok(()) => summary.transformed += 1,
            Err(e) => {
                logger.error(&e.to_string());
                summary.failed += 1;
            }
        }
    }

    logger.info(&format!(
        "Transformed {} files, {} failed",
        summary.transformed, summary.failed
    ));
    summary
}

fn emit(options: &ResolvedOptions, file: &Path, code: &str, logger: &dyn Logger) -> Result<()> {
    let Some(out_dir) = &options.out_dir else {
        println!("// {}", file.display());
        println!("{}", code);
        return Ok(());
    };

    let out_path = output_path(out_dir, file, options.pipeline.emit_js);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).map_err(|e| DevkitError::io(parent, e))?;
    }
    fs::write(&out_path, code).map_err(|e| DevkitError::io(&out_path, e))?;
    logger.debug(&format!("Wrote {}", out_path.display()));
    Ok(())
}

/// Parse `args` and run. Returns the process exit code.
pub fn try_main<I, T>(args: I) -> anyhow::Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;

    if matches.get_flag("print-key") {
        println!("{}@{}", inline_assets::NAME, inline_assets::VERSION);
        return Ok(0);
    }

    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let config = load_config(&matches, &cwd).context("failed to load configuration")?;

    let options = resolve_options(&matches, config);
    let logger = ConsoleLogger::new(options.log_level);
    logger.debug(&version_string());
    Ok(run(&options, &logger).exit_code())
}

/// [`try_main`], reporting errors on stderr.
pub fn main_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match try_main(args) {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<clap::Error>() {
            // --help and --version end up here too
            Some(clap_error) => {
                let _ = clap_error.print();
                clap_error.exit_code()
            }
            None => {
                eprintln!("Error: {:#}", e);
                1
            }
        },
    }
}
