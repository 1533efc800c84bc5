//! conversion between bit strings and byte-aligned storage
use bitvec::prelude::*;

use crate::error::{Error, Result};

/// a logical sequence of bits, first bit stored in the most significant position of a byte
pub type Bits = BitVec<u8, Msb0>;

/// pack bits into bytes, filling the trailing partial byte with zeros
pub fn pack(bits: &BitSlice<u8, Msb0>) -> Vec<u8> {
    // copy bit by bit, a slice may start in the middle of a byte
    let mut padded: Bits = bits.iter().by_vals().collect();
    padded.resize((bits.len() + 7) / 8 * 8, false);
    padded.into_vec()
}

/// unpack bytes into exactly 8 bits per byte, padding included
pub fn unpack(bytes: &[u8]) -> Bits {
    Bits::from_slice(bytes)
}

/// read a string of '0' and '1' characters
pub fn parse_bits(s: &str) -> Result<Bits> {
    s.chars()
        .enumerate()
        .map(|(position, found)| match found {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(Error::InvalidBit { position, found }),
        })
        .collect()
}

/// render bits as a string of '0' and '1' characters
pub fn to_bit_string(bits: &BitSlice<u8, Msb0>) -> String {
    bits.iter().map(|bit| if *bit { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_last_byte_with_zeros() {
        let bits = parse_bits("1010110011").unwrap();
        assert_eq!(pack(&bits), vec![0b1010_1100, 0b1100_0000]);
    }

    #[test]
    fn whole_bytes_need_no_padding() {
        let bits = parse_bits("0000000111111110").unwrap();
        assert_eq!(pack(&bits), vec![0x01, 0xfe]);
        assert!(pack(&Bits::new()).is_empty());
    }

    #[test]
    fn packs_slices_not_starting_on_a_byte() {
        let bits = parse_bits("1111111100000000").unwrap();
        assert_eq!(pack(&bits[4..12]), vec![0b1111_0000]);
        assert_eq!(pack(&bits[3..6]), vec![0b1110_0000]);
    }

    #[test]
    fn unpack_keeps_prefix_and_zero_tail() {
        for s in ["", "1", "0110", "11111111", "101010101", "0000000000000001"] {
            let bits = parse_bits(s).unwrap();
            let unpacked = unpack(&pack(&bits));
            assert_eq!(unpacked.len() % 8, 0);
            assert!(unpacked.len() - bits.len() < 8);
            assert_eq!(&unpacked[..bits.len()], bits.as_bitslice());
            assert!(unpacked[bits.len()..].not_any());
        }
    }

    #[test]
    fn rejects_non_binary_characters() {
        match parse_bits("0102") {
            Err(Error::InvalidBit { position, found }) => {
                assert_eq!(position, 2);
                assert_eq!(found, '2');
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn renders_bits_back_to_text() {
        assert_eq!(to_bit_string(&parse_bits("001011").unwrap()), "001011");
    }
}
