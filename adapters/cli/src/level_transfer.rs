//! Single-line share strings for copy/paste level transfer.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use blockslide_core::{
    BlockDefinition, CellCoord, LevelDefinition, StarThresholds, TileDefinition, MAX_LEVEL_EDGE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SHARE_DOMAIN: &str = "blockslide";
const SHARE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const SHARE_HEADER: &str = "blockslide:v1";
/// Delimiter used to separate the prefix, level dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Errors that can occur while encoding or decoding share strings.
#[derive(Debug, Error)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("share string was empty")]
    EmptyPayload,
    /// The prefix segment was missing.
    #[error("share string is missing the prefix")]
    MissingPrefix,
    /// The version segment was missing.
    #[error("share string is missing the version")]
    MissingVersion,
    /// The dimensions segment was missing.
    #[error("share string is missing the level dimensions")]
    MissingDimensions,
    /// The payload segment was missing.
    #[error("share string is missing the payload")]
    MissingPayload,
    /// The prefix segment named another format.
    #[error("share prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The version segment named an unsupported revision.
    #[error("share version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimensions segment could not be parsed.
    #[error("could not parse level dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode share payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse share payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The level could not be serialised.
    #[error("could not serialise level: {0}")]
    Serialise(#[source] serde_json::Error),
}

/// Level fields carried in the payload; dimensions travel in the header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SharedLevel {
    version: u32,
    #[serde(default)]
    name: String,
    moves: u32,
    #[serde(default)]
    stars: Option<StarThresholds>,
    #[serde(default)]
    walls: Vec<CellCoord>,
    blocks: Vec<BlockDefinition>,
    #[serde(default)]
    tiles: Vec<TileDefinition>,
}

/// Encodes the level into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(level: &LevelDefinition) -> Result<String, LevelTransferError> {
    let payload = SharedLevel {
        version: level.version,
        name: level.name.clone(),
        moves: level.moves,
        stars: level.stars,
        walls: level.walls.clone(),
        blocks: level.blocks.clone(),
        tiles: level.tiles.clone(),
    };
    let json = serde_json::to_vec(&payload).map_err(LevelTransferError::Serialise)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{SHARE_HEADER}:{}x{}:{encoded}",
        level.width, level.height
    ))
}

/// Decodes a level from the provided share string.
pub(crate) fn decode(value: &str) -> Result<LevelDefinition, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != SHARE_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SHARE_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (width, height) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    let shared: SharedLevel =
        serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)?;

    Ok(LevelDefinition {
        version: shared.version,
        name: shared.name,
        width,
        height,
        moves: shared.moves,
        stars: shared.stars,
        walls: shared.walls,
        blocks: shared.blocks,
        tiles: shared.tiles,
    })
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LevelTransferError> {
    let invalid = || LevelTransferError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    if width == 0 || height == 0 || width > MAX_LEVEL_EDGE || height > MAX_LEVEL_EDGE {
        return Err(invalid());
    }

    Ok((width, height))
}
