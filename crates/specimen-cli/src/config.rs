//! Configuration file loading and CLI overrides.

use anyhow::{Context, Result};
use specimen_synth::{GuidStrategy, ResolutionPolicy, SynthConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "specimen.json";

pub fn parse_config(source: &str) -> Result<SynthConfig> {
    let config = serde_json::from_str(source).context("failed to parse configuration")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<SynthConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    parse_config(&source).with_context(|| format!("in {}", path.display()))
}

/// The configuration file to use: `--config` when given, otherwise
/// `specimen.json` in `cwd` if it exists.
pub fn find_config(args: &CliArgs, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(cwd.join(path));
    }
    let candidate = cwd.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Load the file configuration (or defaults) and apply CLI flags on top.
pub fn resolve_config(args: &CliArgs, cwd: &Path) -> Result<SynthConfig> {
    let mut config = match find_config(args, cwd) {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            load_config(&path)?
        }
        None => SynthConfig::default(),
    };
    apply_cli_overrides(&mut config, args);
    Ok(config)
}

/// Flags only ever switch settings on; an absent flag keeps the file value.
pub fn apply_cli_overrides(config: &mut SynthConfig, args: &CliArgs) {
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if args.most_specific {
        config.resolution = ResolutionPolicy::MostSpecific;
    }
    if args.fixed_guids {
        config.guids = GuidStrategy::Fixed;
    }
    if args.constructor_fallback {
        config.constructor_fallback = true;
    }
}
