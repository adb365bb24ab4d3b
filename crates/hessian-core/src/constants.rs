//! Wire-level opcode constants for the Hessian 2.0 binary encoding.
//!
//! Every constant here names a single opcode byte or the first byte of
//! an opcode range exactly as it appears on the wire. Range bounds are
//! expressed as `..=` pairs so callers can pattern-match directly:
//!
//! ```
//! use hessian_core::constants::*;
//!
//! fn is_compact_int32(byte: u8) -> bool {
//!     (INT32_DIRECT_MIN..=INT32_DIRECT_MAX).contains(&byte)
//! }
//! assert!(is_compact_int32(0x90));
//! ```

// ====== Literals ======

pub const NULL: u8 = 0x4e; // 'N'
pub const TRUE: u8 = 0x54; // 'T'
pub const FALSE: u8 = 0x46; // 'F'

// ====== 32-bit integers ======
//
// | form          | range         | value                                  |
// |---------------|---------------|----------------------------------------|
// | single octet  | 0x80..=0xbf   | `byte - 0x90`                          |
// | two octets    | 0xc0..=0xcf   | `(b0 - 0xc8) * 256 + b1`               |
// | three octets  | 0xd0..=0xd7   | `(b0 - 0xd4) * 65536 + b1 * 256 + b2`  |
// | four octets   | 'I' (0x49)    | big-endian i32                         |

pub const INT32_DIRECT_MIN: u8 = 0x80;
pub const INT32_DIRECT_MAX: u8 = 0xbf;
pub const INT32_DIRECT_OFFSET: i32 = 0x90;

pub const INT32_BYTE_MIN: u8 = 0xc0;
pub const INT32_BYTE_MAX: u8 = 0xcf;
pub const INT32_BYTE_OFFSET: i32 = 0xc8;

pub const INT32_SHORT_MIN: u8 = 0xd0;
pub const INT32_SHORT_MAX: u8 = 0xd7;
pub const INT32_SHORT_OFFSET: i32 = 0xd4;

pub const INT32: u8 = 0x49; // 'I'

// ====== 64-bit integers ======

pub const INT64_DIRECT_MIN: u8 = 0xd8;
pub const INT64_DIRECT_MAX: u8 = 0xef;
pub const INT64_DIRECT_OFFSET: i64 = 0xe0;

pub const INT64_BYTE_MIN: u8 = 0xf0;
pub const INT64_BYTE_MAX: u8 = 0xff;
pub const INT64_BYTE_OFFSET: i64 = 0xf8;

pub const INT64_SHORT_MIN: u8 = 0x38;
pub const INT64_SHORT_MAX: u8 = 0x3f;
pub const INT64_SHORT_OFFSET: i64 = 0x3c;

pub const INT64_INT: u8 = 0x59; // four-octet long, sign-extended from i32
pub const INT64: u8 = 0x4c; // 'L', eight octets

// ====== Doubles ======

pub const DOUBLE_ZERO: u8 = 0x5b;
pub const DOUBLE_ONE: u8 = 0x5c;
pub const DOUBLE_BYTE: u8 = 0x5d; // 1 octet, signed
pub const DOUBLE_SHORT: u8 = 0x5e; // 2 octets, signed
pub const DOUBLE_FLOAT: u8 = 0x5f; // 4 octets, IEEE-754 single promoted to double
pub const DOUBLE: u8 = 0x44; // 'D', 8 octets, IEEE-754 double

// ====== Strings ======
//
// Lengths on compact and short forms count UTF-8 characters, not bytes.
// 'R' begins a non-final chunk, 'S' a final chunk; chunk length is
// always a full two-octet prefix (no bits embedded in the opcode).

pub const STRING_COMPACT_MIN: u8 = 0x00;
pub const STRING_COMPACT_MAX: u8 = 0x1f;

pub const STRING_SHORT_MIN: u8 = 0x30;
pub const STRING_SHORT_MAX: u8 = 0x33;

pub const STRING_CHUNK: u8 = 0x52; // 'R'
pub const STRING_CHUNK_FINAL: u8 = 0x53; // 'S'

// ====== Binary ======

pub const BINARY_COMPACT_MIN: u8 = 0x20;
pub const BINARY_COMPACT_MAX: u8 = 0x2f;

pub const BINARY_SHORT_MIN: u8 = 0x34;
pub const BINARY_SHORT_MAX: u8 = 0x37;

pub const BINARY_CHUNK: u8 = 0x41; // 'A'
pub const BINARY_CHUNK_FINAL: u8 = 0x42; // 'B'

// ====== Timestamps ======

pub const TIMESTAMP_MILLIS: u8 = 0x4a;
pub const TIMESTAMP_MINUTES: u8 = 0x4b;

// ====== Vectors ======

pub const VECTOR_TYPED_STREAMED: u8 = 0x55; // 'U'
pub const VECTOR_TYPED_FIXED: u8 = 0x56; // 'V'
pub const VECTOR_STREAMED: u8 = 0x57; // 'W'
pub const VECTOR_FIXED: u8 = 0x58; // 'X'

pub const VECTOR_TYPED_FIXED_COMPACT_MIN: u8 = 0x70;
pub const VECTOR_TYPED_FIXED_COMPACT_MAX: u8 = 0x77;

pub const VECTOR_FIXED_COMPACT_MIN: u8 = 0x78;
pub const VECTOR_FIXED_COMPACT_MAX: u8 = 0x7f;

// ====== Maps ======

pub const MAP_TYPED: u8 = 0x4d; // 'M'
pub const MAP_UNTYPED: u8 = 0x48; // 'H'

// ====== Class definitions & object instances ======

pub const CLASS_DEFINITION: u8 = 0x43; // 'C'

pub const OBJECT_INSTANCE: u8 = 0x4f; // 'O'
pub const OBJECT_INSTANCE_COMPACT_MIN: u8 = 0x60;
pub const OBJECT_INSTANCE_COMPACT_MAX: u8 = 0x6f;

// ====== Back-references ======

pub const REFERENCE: u8 = 0x51; // 'Q'

// ====== Terminators ======

/// Closes a streamed vector or an untyped/typed map's key/value run.
/// Only ever valid when the top parse frame expects it; never a BEGIN
/// opener on its own.
pub const TERMINATOR: u8 = 0x5a; // 'Z'
