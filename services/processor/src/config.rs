use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

pub const DEFAULT_INPUT_DIR: &str = "../raw";
pub const DEFAULT_OUTPUT_DIR: &str = "../../frontend/public/data";

/// Command-line arguments for cvdp-process
#[derive(Parser, Debug, Clone)]
#[command(name = "cvdp-process")]
#[command(about = "Process CVDP JSONL files into explorer-ready JSON.")]
#[command(version)]
pub struct Args {
    /// Directory containing source JSONL files
    #[arg(long, default_value = DEFAULT_INPUT_DIR, env = "CVDP_INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for normalized JSON files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR, env = "CVDP_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Directory that relative paths are resolved against (defaults to this tool's crate directory)
    #[arg(long, env = "CVDP_BASE_DIR")]
    pub base_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let base_dir = args
            .base_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));

        let base_dir = if base_dir.is_absolute() {
            base_dir
        } else {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            resolve(&cwd, &base_dir)
        };

        Ok(Self {
            input_dir: resolve(&base_dir, &args.input_dir),
            output_dir: resolve(&base_dir, &args.output_dir),
        })
    }
}

/// Absolute paths pass through; relative ones are joined onto `base` and
/// normalized lexically. Nothing needs to exist yet.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let mut out = PathBuf::new();
    for component in base.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
