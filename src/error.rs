use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// the code table has no entry for a symbol of the input
    #[error("symbol {symbol} at position {position} has no code")]
    UnknownSymbol { position: usize, symbol: String },

    /// there is something other than 0s and 1s in the bit string
    #[error("unexpected non-binary character {found:?} at position {position}")]
    InvalidBit { position: usize, found: char },

    /// the stream ends in the middle of a code
    #[error("bit stream ends inside a code starting at bit {position}")]
    IncompleteCode { position: usize },

    /// the bits at this position are not a prefix of any code
    #[error("no code matches the bits at position {position}")]
    UnassignedCode { position: usize },

    /// the tree is too deep for its codes to fit a machine word
    #[error("code length {length} exceeds the limit of {}", crate::canonical::MAX_CODE_LENGTH)]
    CodeTooLong { length: usize },

    /// something is wrong with the code length table
    #[error("malformed metadata: {0}")]
    MalformedMetadata(#[from] MetadataError),
}

#[derive(Error, Debug)]
pub enum MetadataError {
    /// metadata block is not valid JSON of the expected shape
    #[error("{0}")]
    Syntax(#[from] serde_json::Error),

    /// a key of the length table is not exactly one symbol
    #[error("{0:?} is not a single symbol")]
    NotASymbol(String),

    /// lengths must be at least one bit
    #[error("symbol {0} has a non-positive code length")]
    NonPositiveLength(String),

    #[error(
        "symbol {symbol} has code length {length}, the limit is {}",
        crate::canonical::MAX_CODE_LENGTH
    )]
    TooLong { symbol: String, length: usize },

    /// there are more short codes than a prefix-free code can hold
    #[error("code lengths do not describe a prefix-free code")]
    Oversubscribed,

    #[error("separator between metadata and payload not found")]
    MissingSeparator,

    #[error("metadata contains the separator byte {0:#04x}")]
    SeparatorInMetadata(u8),

    #[error("metadata declares {declared} bits but the payload holds {available}")]
    BitCountMismatch { declared: usize, available: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
