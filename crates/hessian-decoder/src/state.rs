//! Parse-frame state shared by the decoder's pushdown automaton.
//!
//! Every partially-decoded value the decoder is in the middle of
//! building is represented by one [`Frame`] on an explicit stack (see
//! [`crate::stack::ParseStack`]) rather than by Rust call-stack
//! recursion — a deeply nested Hessian value must not be able to blow
//! the decoder's own stack.

use std::cell::RefCell;
use std::rc::Rc;

use hessian_core::{ClassDef, ObjectValue, Value};

/// How many more octets a fixed-width scalar still needs, and how to
/// interpret them once they've all arrived. Single-byte-opener scalars
/// (e.g. direct int32, the double constants) never need one of these —
/// they emit immediately from the opcode byte alone.
#[derive(Debug, Clone, Copy)]
pub(crate) enum NumericKind {
    Int32Two { hi: i32 },
    Int32Three { hi: i32 },
    Int32Four,
    Int64Two { hi: i64 },
    Int64Three { hi: i64 },
    Int64FourAsLong,
    Int64Eight,
    DoubleByte,
    DoubleShort,
    DoubleFloat,
    DoubleFull,
    TimestampMillis,
    TimestampMinutes,
}

impl NumericKind {
    pub(crate) fn needed(self) -> usize {
        match self {
            NumericKind::Int32Two { .. }
            | NumericKind::Int64Two { .. }
            | NumericKind::DoubleByte => 1,
            NumericKind::Int32Three { .. }
            | NumericKind::Int64Three { .. }
            | NumericKind::DoubleShort => 2,
            NumericKind::Int32Four
            | NumericKind::Int64FourAsLong
            | NumericKind::DoubleFloat
            | NumericKind::TimestampMinutes => 4,
            NumericKind::Int64Eight | NumericKind::DoubleFull | NumericKind::TimestampMillis => 8,
        }
    }

    pub(crate) fn finish(self, buf: &[u8]) -> hessian_core::Result<Value> {
        use hessian_core::Error;
        Ok(match self {
            NumericKind::Int32Two { hi } => Value::Int(hi * 256 + buf[0] as i32),
            NumericKind::Int32Three { hi } => {
                Value::Int(hi * 65536 + (buf[0] as i32) * 256 + buf[1] as i32)
            }
            NumericKind::Int32Four => {
                Value::Int(i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
            }
            NumericKind::Int64Two { hi } => Value::Long(hi * 256 + buf[0] as i64),
            NumericKind::Int64Three { hi } => {
                Value::Long(hi * 65536 + (buf[0] as i64) * 256 + buf[1] as i64)
            }
            NumericKind::Int64FourAsLong => {
                Value::Long(i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as i64)
            }
            NumericKind::Int64Eight => Value::Long(i64::from_be_bytes([
                buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
            ])),
            NumericKind::DoubleByte => Value::Double(buf[0] as i8 as f64),
            NumericKind::DoubleShort => {
                Value::Double(i16::from_be_bytes([buf[0], buf[1]]) as f64)
            }
            NumericKind::DoubleFloat => {
                Value::Double(f32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as f64)
            }
            NumericKind::DoubleFull => Value::Double(f64::from_be_bytes([
                buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
            ])),
            NumericKind::TimestampMillis => {
                let millis = i64::from_be_bytes([
                    buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
                ]);
                let dt = chrono::DateTime::from_timestamp_millis(millis)
                    .ok_or(Error::InvalidTimestamp { millis })?;
                Value::Date(dt)
            }
            NumericKind::TimestampMinutes => {
                let minutes = i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as i64;
                let dt = chrono::DateTime::from_timestamp(minutes * 60, 0)
                    .ok_or(Error::InvalidTimestamp { millis: minutes * 60_000 })?;
                Value::Date(dt)
            }
        })
    }
}

/// The phases a length-delimited string or binary value passes through:
/// first (optionally) the length prefix, which may itself span more
/// than one `feed()` call, then the payload bytes, and — for a
/// non-final chunk — back to `AwaitingOpener` for the next chunk's
/// `'R'`/`'S'`/`'A'`/`'B'` byte.
#[derive(Debug, Clone)]
pub(crate) enum LenPhase {
    /// `base` carries any length bits already embedded in the opcode
    /// byte (short forms); `needed` is how many more length bytes are
    /// still expected (1 for short forms, 2 for 'R'/'S'/'A'/'B' chunks).
    ReadingLen { base: usize, buf: Vec<u8>, needed: usize },
    ReadingPayload { expected: usize, buf: Vec<u8> },
    /// A non-final chunk's payload just completed; the next byte must
    /// be a chunk opener, not further payload data.
    AwaitingOpener,
}

#[derive(Debug, Clone)]
pub(crate) struct StringAccum {
    pub phase: LenPhase,
    /// Content assembled from chunks completed so far.
    pub prefix: String,
    pub is_final: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct BinaryAccum {
    pub phase: LenPhase,
    pub prefix: Vec<u8>,
    pub is_final: bool,
}

/// Whether a vector's element count is known yet, and if so whether
/// completion is driven by a `Z` terminator or by reaching a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VectorMode {
    Streamed,
    FixedPending,
    Fixed(usize),
}

/// One frame of the explicit parse stack. Each variant carries exactly
/// the state that particular point in the grammar needs; most are
/// lightweight continuation markers that hold no data of their own
/// because the next byte's meaning is already fully determined by
/// which marker is on top.
pub(crate) enum State {
    Numeric {
        kind: NumericKind,
        buf: Vec<u8>,
    },
    Str(StringAccum),
    Bin(BinaryAccum),
    /// Reads (and discards) the optional type string or int id that
    /// precedes a typed vector or typed map's elements.
    CollectionType,
    /// Reads the int32 size of a `'V'`/`'X'` vector.
    VectorSize,
    /// Reads the int32 index of a `'Q'` back-reference.
    Reference,
    ClassDefName(Rc<RefCell<ClassDef>>),
    ClassDefSize(Rc<RefCell<ClassDef>>),
    ClassDefField { def: Rc<RefCell<ClassDef>>, remaining: usize },
    /// Reads the int32 class-table index of a long-form `'O'` object.
    ObjectInstanceType,
    ObjectInstanceField {
        obj: Rc<RefCell<ObjectValue>>,
        definition: Rc<RefCell<ClassDef>>,
        next_index: usize,
    },
    Vector {
        items: Rc<RefCell<Vec<Value>>>,
        mode: VectorMode,
    },
    MapKey {
        map: Rc<RefCell<hessian_core::OrderedMap>>,
    },
    MapValue {
        map: Rc<RefCell<hessian_core::OrderedMap>>,
        key: Value,
    },
}
