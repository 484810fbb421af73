//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::config::{MobiConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    pub config: MobiConfig,
    /// File the config came from, if any.
    pub config_file: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
}

impl Context {
    /// Load the config named on the command line, or the nearest
    /// `mobistore.toml` up the directory tree. Environment overrides apply
    /// either way.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_file) = match config_path {
            Some(path) => (MobiConfig::load(Path::new(path))?, Some(PathBuf::from(path))),
            None => match find_config(&cwd) {
                Some(path) => (MobiConfig::load(&path)?, Some(path)),
                None => (MobiConfig::default(), None),
            },
        };

        Ok(Self {
            config: config.with_env_overrides(),
            config_file,
            output,
            cwd,
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.cwd.join(path)
        }
    }
}

fn find_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.exists() {
                return Some(candidate);
            }
        }
        if !current.pop() {
            return None;
        }
    }
}
