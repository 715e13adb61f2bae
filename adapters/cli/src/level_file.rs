//! Loading and storing level definitions as TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use blockslide_core::LevelDefinition;

/// Reads and parses the level stored at `path`.
pub(crate) fn load(path: &Path) -> Result<LevelDefinition> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid level file {}", path.display()))
}

/// Parses a level from TOML text.
pub(crate) fn parse(contents: &str) -> Result<LevelDefinition> {
    toml::from_str(contents).context("failed to parse level toml contents")
}

/// Renders a level as TOML text.
pub(crate) fn to_toml(level: &LevelDefinition) -> Result<String> {
    toml::to_string_pretty(level).context("failed to serialise level as toml")
}

/// Writes a level to `path`, replacing any existing file.
pub(crate) fn save(path: &Path, level: &LevelDefinition) -> Result<()> {
    let contents = to_toml(level)?;
    fs::write(path, contents)
        .with_context(|| format!("failed to write level file at {}", path.display()))
}
