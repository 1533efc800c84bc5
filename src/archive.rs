//! Layout of a compressed text: the code length metadata as compact JSON,
//! one separator byte, then the packed payload.
//!
//! The metadata records the exact payload length in bits, so the zero bits
//! padding the last byte are never decoded as symbols.
use std::collections::BTreeMap;

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::canonical::CodeLengthTable;
use crate::error::{MetadataError, Result};
use crate::pack::{self, Bits};
use crate::stream;

/// settings of the persisted layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// byte between metadata and payload, must never occur in the metadata
    pub separator: u8,
}

impl Default for Config {
    fn default() -> Self {
        // compact JSON escapes every newline inside strings
        Config { separator: b'\n' }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
    bits: usize,
    lengths: BTreeMap<String, usize>,
}

/// lay out encoded bits and their code lengths
pub fn write(
    config: &Config,
    bits: &BitSlice<u8, Msb0>,
    lengths: &CodeLengthTable<char>,
) -> Result<Vec<u8>> {
    let metadata = Metadata {
        bits: bits.len(),
        lengths: lengths
            .iter()
            .map(|(symbol, &length)| (symbol.to_string(), length))
            .collect(),
    };
    let mut bytes = serde_json::to_vec(&metadata).map_err(MetadataError::from)?;
    if bytes.contains(&config.separator) {
        return Err(MetadataError::SeparatorInMetadata(config.separator).into());
    }
    bytes.push(config.separator);
    bytes.extend(pack::pack(bits));
    Ok(bytes)
}

/// split a compressed text back into encoded bits and code lengths
pub fn read(config: &Config, bytes: &[u8]) -> Result<(Bits, CodeLengthTable<char>)> {
    let split = bytes
        .iter()
        .position(|&byte| byte == config.separator)
        .ok_or(MetadataError::MissingSeparator)?;
    let (metadata, payload) = (&bytes[..split], &bytes[split + 1..]);
    let metadata: Metadata = serde_json::from_slice(metadata).map_err(MetadataError::from)?;

    let mut lengths = CodeLengthTable::new();
    for (key, length) in metadata.lengths {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => {
                lengths.insert(symbol, length);
            }
            _ => return Err(MetadataError::NotASymbol(key).into()),
        }
    }

    let mut bits = pack::unpack(payload);
    if metadata.bits > bits.len() {
        return Err(MetadataError::BitCountMismatch {
            declared: metadata.bits,
            available: bits.len(),
        }
        .into());
    }
    bits.truncate(metadata.bits);
    log::trace!(
        "read {} code lengths and {} payload bits",
        lengths.len(),
        metadata.bits
    );
    Ok((bits, lengths))
}

/// compress a text into its persisted form
pub fn compress_text(config: &Config, text: &str) -> Result<Vec<u8>> {
    let symbols = text.chars().collect::<Vec<char>>();
    let (bits, lengths) = stream::compress(&symbols)?;
    write(config, &bits, &lengths)
}

/// restore a text from its persisted form
pub fn decompress_text(config: &Config, bytes: &[u8]) -> Result<String> {
    let (bits, lengths) = read(config, bytes)?;
    Ok(stream::decompress(&bits, &lengths)?.into_iter().collect())
}
