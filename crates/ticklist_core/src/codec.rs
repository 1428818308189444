//! Snapshot codec for the persisted item list.
//!
//! # Responsibility
//! - Convert the in-memory list to/from its durable JSON text form.
//! - Distinguish "nothing persisted" from "persisted data is corrupt".
//!
//! # Invariants
//! - `decode(&encode(items)?)` returns `items` unchanged.
//! - Decoding never panics; malformed input yields `CodecError`.
//! - A decoded list never contains duplicate ids.

use crate::model::item::{first_duplicate_id, Item, ItemId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CodecResult<T> = Result<T, CodecError>;

/// Snapshot encode/decode failure.
#[derive(Debug)]
pub enum CodecError {
    /// Serialization of the in-memory list failed.
    Encode(serde_json::Error),
    /// Persisted text is not a JSON list of items.
    Malformed(serde_json::Error),
    /// Persisted list contains the same id more than once.
    DuplicateId(ItemId),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode item snapshot: {err}"),
            Self::Malformed(err) => write!(f, "malformed item snapshot: {err}"),
            Self::DuplicateId(id) => write!(f, "item snapshot contains duplicate id {id}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Malformed(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

/// Encodes the full list as a JSON array.
pub fn encode(items: &[Item]) -> CodecResult<String> {
    serde_json::to_string(items).map_err(CodecError::Encode)
}

/// Decodes a JSON array of items.
pub fn decode(text: &str) -> CodecResult<Vec<Item>> {
    let items: Vec<Item> = serde_json::from_str(text).map_err(CodecError::Malformed)?;
    if let Some(id) = first_duplicate_id(&items) {
        return Err(CodecError::DuplicateId(id));
    }
    Ok(items)
}

/// Decodes a raw store value.
///
/// Returns `Ok(None)` when nothing was persisted (missing or blank value).
pub fn decode_snapshot(raw: Option<&str>) -> CodecResult<Option<Vec<Item>>> {
    match raw {
        Some(text) if !text.trim().is_empty() => decode(text).map(Some),
        _ => Ok(None),
    }
}
