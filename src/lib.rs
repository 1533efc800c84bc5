//! Lossless text compression with canonical Huffman codes.
//!
//! Only the code length of each symbol is kept next to the encoded bits,
//! the canonical code is rebuilt from those lengths when decoding.
//!
//! ```
//! let text: Vec<char> = "abracadabra".chars().collect();
//! let (bits, lengths) = huffman::compress(&text)?;
//! assert_eq!(huffman::decompress(&bits, &lengths)?, text);
//! # Ok::<(), huffman::Error>(())
//! ```

pub mod archive;
pub mod canonical;
pub mod error;
pub mod huffman;
pub mod pack;
pub mod stream;
pub mod util;

pub use canonical::{Canonical, CodeLengthTable};
pub use error::{Error, MetadataError, Result};
pub use huffman::{CodeTable, Tree};
pub use pack::Bits;
pub use stream::{compress, decompress, encode};
pub use util::{count_occurrences, FrequencyTable};
