use std::fmt::Debug;

use bitvec::prelude::*;

use crate::canonical::{self, Canonical, CodeLengthTable, MAX_CODE_LENGTH};
use crate::error::{Error, Result};
use crate::huffman::{CodeTable, Tree};
use crate::pack::Bits;
use crate::util;

/// concatenate the code of each symbol, in order
pub fn encode<S, I>(table: &CodeTable<S>, symbols: I) -> Result<Bits>
where
    S: Ord + Debug,
    I: IntoIterator<Item = S>,
{
    let mut encoded = Bits::new();
    for (position, symbol) in symbols.into_iter().enumerate() {
        let code = table.get(&symbol).ok_or_else(|| Error::UnknownSymbol {
            position,
            symbol: format!("{:?}", symbol),
        })?;
        encoded.extend_from_bitslice(code.as_bitslice());
    }
    Ok(encoded)
}

/// encode symbols with the canonical code fitted to them
/// returns the encoded bits and the code lengths needed to decode them
pub fn compress<S>(symbols: &[S]) -> Result<(Bits, CodeLengthTable<S>)>
where
    S: Ord + Clone + Debug,
{
    let occurrences = util::count_occurrences(symbols.iter().cloned());
    let tree = match Tree::new(&occurrences) {
        Some(tree) => tree,
        None => return Ok((Bits::new(), CodeLengthTable::new())),
    };
    let lengths = canonical::lengths_of(&tree.code_table());
    if let Some(&length) = lengths.values().max() {
        if length > MAX_CODE_LENGTH {
            return Err(Error::CodeTooLong { length });
        }
    }
    let table = Canonical::new(&lengths)?.code_table();
    let encoded = encode(&table, symbols.iter().cloned())?;
    log::debug!(
        "compressed {} symbols into {} bits",
        symbols.len(),
        encoded.len()
    );
    Ok((encoded, lengths))
}

/// rebuild the canonical code from its lengths and decode all of `bits`
pub fn decompress<S>(bits: &BitSlice<u8, Msb0>, lengths: &CodeLengthTable<S>) -> Result<Vec<S>>
where
    S: Ord + Clone + Debug,
{
    let decoded = Canonical::new(lengths)?.decoder().decode(bits)?;
    log::debug!("decompressed {} bits into {} symbols", bits.len(), decoded.len());
    Ok(decoded)
}
