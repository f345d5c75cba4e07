//! sfe-explore - list the transforms a feature extraction library provides.
//!
//! Run with: sfe-explore --library build/libSoundFeatureExtraction.so

use anyhow::{Context, Result, bail};
use clap::Parser;
use sound_feature_extraction::config::{self, ExplorerConfig};
use sound_feature_extraction::explorer::Explorer;
use sound_feature_extraction::library::Library;
use sound_feature_extraction::logging;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sfe-explore")]
#[command(about = "List the transforms exposed by a sound feature extraction library")]
#[command(version)]
struct Args {
    /// Path to the library to load
    #[arg(short, long, env = config::LIBRARY_PATH_ENV)]
    library: Option<PathBuf>,

    /// Library name to search for when no path is given
    #[arg(short, long, default_value = config::DEFAULT_LIBRARY_NAME)]
    name: String,

    /// Extra directory to search (repeatable, searched before the defaults)
    #[arg(short, long = "search-path")]
    search_paths: Vec<PathBuf>,

    /// Only show this transform
    #[arg(short, long, conflicts_with = "successors")]
    transform: Option<String>,

    /// Show the transforms that can consume this transform's output
    #[arg(long)]
    successors: Option<String>,

    /// Print transform names only
    #[arg(long)]
    names_only: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(logging::level_from_verbosity(args.verbose));

    let mut config = ExplorerConfig::from_env().with_library_name(&args.name);
    if let Some(path) = &args.library {
        config = config.with_library_path(path);
    }
    // Command-line directories go ahead of those from the environment.
    let env_paths = std::mem::take(&mut config.search_paths);
    config.search_paths = args.search_paths.iter().cloned().chain(env_paths).collect();

    let path = config.resolve().context("failed to locate library")?;
    // SAFETY: The user chose this library; loading it runs its code.
    let library = unsafe { Library::open(&path) }
        .with_context(|| format!("failed to load {}", path.display()))?;
    let explorer = Explorer::new(&library)
        .with_context(|| format!("failed to query {}", path.display()))?;

    info!(
        library = %explorer.library_name(),
        version = %explorer.library_version(),
        transforms = explorer.len(),
        "loaded {}",
        path.display()
    );

    let selected: Vec<_> = if let Some(name) = &args.transform {
        match explorer.get(name) {
            Some(t) => vec![t],
            None => bail!("no transform named '{name}' in {}", path.display()),
        }
    } else if let Some(name) = &args.successors {
        match explorer.successors(name) {
            Some(list) => list,
            None => bail!("no transform named '{name}' in {}", path.display()),
        }
    } else {
        explorer.iter().collect()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for transform in selected {
        if args.names_only {
            writeln!(out, "{}", transform.name)?;
        } else {
            writeln!(out, "{transform}")?;
            writeln!(out)?;
        }
    }
    Ok(())
}
