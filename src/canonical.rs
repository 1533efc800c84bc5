//! Canonical Huffman codes.
//!
//! A canonical code is fully determined by the code length of each symbol:
//! symbols are ordered by (length, symbol), the first one gets all zeros and
//! every following code is the previous one plus one, shifted left by the
//! growth in length. Only the lengths need to be stored to decode.
use std::collections::BTreeMap;
use std::fmt::Debug;

use bitvec::prelude::*;

use crate::error::{Error, MetadataError, Result};
use crate::huffman::CodeTable;
use crate::pack::Bits;

/// longest code accepted, codes are held in a u64
pub const MAX_CODE_LENGTH: usize = 63;

/// codes up to this length are decoded through a single table lookup
pub const LOOKUP_BITS: usize = 12;

/// mapping from symbol to the length of its code
pub type CodeLengthTable<S> = BTreeMap<S, usize>;

/// lengths of the codes of a code table
pub fn lengths_of<S>(table: &CodeTable<S>) -> CodeLengthTable<S>
where
    S: Ord + Clone,
{
    table
        .iter()
        .map(|(symbol, code)| (symbol.clone(), code.len()))
        .collect()
}

/// symbols of each code length, in ascending symbol order
pub fn group_by_length<S>(lengths: &CodeLengthTable<S>) -> BTreeMap<usize, Vec<S>>
where
    S: Ord + Clone,
{
    let mut groups: BTreeMap<usize, Vec<S>> = BTreeMap::new();
    for (symbol, &length) in lengths {
        groups.entry(length).or_default().push(symbol.clone());
    }
    groups
}

/// canonical code assignment, ordered by (length, symbol)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical<S> {
    codes: Vec<Assigned<S>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Assigned<S> {
    symbol: S,
    code: u64,
    length: usize,
}

impl<S> Canonical<S>
where
    S: Ord + Clone + Debug,
{
    /// assign canonical codes to the given lengths
    pub fn new(lengths: &CodeLengthTable<S>) -> Result<Self> {
        let mut sorted = lengths
            .iter()
            .map(|(symbol, &length)| {
                if length == 0 {
                    Err(MetadataError::NonPositiveLength(format!("{:?}", symbol)))
                } else if length > MAX_CODE_LENGTH {
                    Err(MetadataError::TooLong {
                        symbol: format!("{:?}", symbol),
                        length,
                    })
                } else {
                    Ok((symbol, length))
                }
            })
            .collect::<Result<Vec<(&S, usize)>, MetadataError>>()?;
        // the table is already in symbol order, a stable sort on length finishes the job
        sorted.sort_by_key(|&(_, length)| length);

        let mut codes = Vec::with_capacity(sorted.len());
        let mut code: u64 = 0;
        let mut previous_length = sorted.first().map_or(0, |&(_, length)| length);
        for (index, (symbol, length)) in sorted.into_iter().enumerate() {
            if index > 0 {
                code = (code + 1) << (length - previous_length);
            }
            if code >> length != 0 {
                return Err(MetadataError::Oversubscribed.into());
            }
            previous_length = length;
            codes.push(Assigned {
                symbol: symbol.clone(),
                code,
                length,
            });
        }
        log::debug!(
            "assigned {} canonical codes, longest {} bits",
            codes.len(),
            previous_length
        );
        Ok(Canonical { codes })
    }

    /// longest code length, zero without symbols
    pub fn max_length(&self) -> usize {
        self.codes.last().map_or(0, |assigned| assigned.length)
    }

    /// the canonical codes as bit strings
    pub fn code_table(&self) -> CodeTable<S> {
        self.codes
            .iter()
            .map(|assigned| {
                let code = (0..assigned.length)
                    .rev()
                    .map(|shift| (assigned.code >> shift) & 1 == 1)
                    .collect::<Bits>();
                (assigned.symbol.clone(), code)
            })
            .collect()
    }

    /// decoder working from the lengths alone, no tree needed
    pub fn decoder(&self) -> Decoder<S> {
        let max_length = self.max_length();
        let lookup_bits = usize::min(max_length, LOOKUP_BITS);
        let mut slots = vec![None; 1 << lookup_bits];
        // first code, index of its symbol and number of codes, per length
        let mut by_length = vec![(0u64, 0usize, 0usize); max_length + 1];
        for (index, assigned) in self.codes.iter().enumerate() {
            let (first_code, first_index, count) = &mut by_length[assigned.length];
            if *count == 0 {
                *first_code = assigned.code;
                *first_index = index;
            }
            *count += 1;

            if assigned.length <= lookup_bits {
                // every window starting with this code decodes to it
                let spare = lookup_bits - assigned.length;
                let start = (assigned.code as usize) << spare;
                for slot in &mut slots[start..start + (1 << spare)] {
                    *slot = Some(index);
                }
            }
        }
        Decoder {
            lookup_bits,
            slots,
            by_length,
            symbols: self
                .codes
                .iter()
                .map(|assigned| (assigned.symbol.clone(), assigned.length))
                .collect(),
        }
    }
}

/// decoder of a canonical code
/// short codes are found with one lookup in a 2^lookup_bits table,
/// longer ones bit by bit against the first code of each length
#[derive(Debug, Clone)]
pub struct Decoder<S> {
    lookup_bits: usize,
    /// symbol index for every lookup_bits window starting with a short code
    slots: Vec<Option<usize>>,
    by_length: Vec<(u64, usize, usize)>,
    symbols: Vec<(S, usize)>,
}

impl<S> Decoder<S>
where
    S: Clone,
{
    /// decode all of `bits`, which must end exactly at a code boundary
    pub fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<Vec<S>> {
        let mut decoded = Vec::new();
        let mut position = 0;
        while position < bits.len() {
            let index = match self.lookup(bits, position) {
                Some(index) => index,
                None => self.search(bits, position)?,
            };
            let (symbol, length) = &self.symbols[index];
            if position + length > bits.len() {
                return Err(Error::IncompleteCode { position });
            }
            decoded.push(symbol.clone());
            position += length;
        }
        Ok(decoded)
    }

    fn lookup(&self, bits: &BitSlice<u8, Msb0>, position: usize) -> Option<usize> {
        let end = usize::min(position + self.lookup_bits, bits.len());
        // zero-pad a short window at the end of the stream
        let window = bits[position..end]
            .iter()
            .by_vals()
            .fold(0usize, |window, bit| window << 1 | bit as usize)
            << (self.lookup_bits - (end - position));
        self.slots.get(window).copied().flatten()
    }

    fn search(&self, bits: &BitSlice<u8, Msb0>, position: usize) -> Result<usize> {
        let mut code: u64 = 0;
        let lengths = self.by_length.iter().enumerate().skip(1);
        for (length, &(first_code, first_index, count)) in lengths {
            let bit = match bits.get(position + length - 1) {
                Some(bit) => *bit,
                None => return Err(Error::IncompleteCode { position }),
            };
            code = code << 1 | bit as u64;
            if code >= first_code && code - first_code < count as u64 {
                return Ok(first_index + (code - first_code) as usize);
            }
        }
        Err(Error::UnassignedCode { position })
    }
}
