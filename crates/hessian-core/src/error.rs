use thiserror::Error;

/// Errors produced while decoding a Hessian 2.0 byte stream.
///
/// Every variant names a specific wire-level condition rather than a
/// generic "parse failed" — callers that need to distinguish a
/// malformed opcode from a truncated back-reference table can match on
/// the variant directly instead of parsing the message text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid opcode byte 0x{byte:02x} at start of value")]
    InvalidOpcode { byte: u8 },

    #[error(
        "invalid opcode byte 0x{byte:02x} for {context} (only {expected} openers are valid here)"
    )]
    InvalidStrictOpcode {
        byte: u8,
        context: &'static str,
        expected: &'static str,
    },

    #[error("invalid byte 0x{byte:02x} at string/binary chunk continuation (expected 'R' or 'S'/'A' or 'B')")]
    InvalidChunkContinuation { byte: u8 },

    #[error("unexpected end of stream: {depth} frame(s) still open")]
    UnexpectedEndOfStream { depth: usize },

    #[error("finalize() called before any top-level value was produced")]
    NoValueProduced,

    #[error("back-reference index {index} out of range (reference table has {len} entries)")]
    BackReferenceOutOfRange { index: i32, len: usize },

    #[error("class-definition index {index} out of range (class table has {len} entries)")]
    ClassDefinitionOutOfRange { index: i32, len: usize },

    #[error("parse stack depth {depth} exceeds configured maximum of {max}")]
    StackDepthExceeded { depth: usize, max: usize },

    #[error("string or binary accumulator exceeded the configured byte budget of {max} bytes")]
    AccumulatorBudgetExceeded { max: usize },

    #[error("length or index value {value} is negative")]
    NegativeLength { value: i32 },

    #[error("timestamp {millis}ms since epoch cannot be represented")]
    InvalidTimestamp { millis: i64 },

    #[error("value of unexpected type encountered where {expected} was required")]
    UnexpectedValueType { expected: &'static str },

    #[error("decoder is poisoned by a previous error; call reset() before reuse")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, Error>;
