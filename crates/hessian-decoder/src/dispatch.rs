//! The `BEGIN` opcode dispatcher: classifies the first byte of a value
//! and either emits immediately (single-byte encodings) or pushes a
//! frame whose state consumes the remaining bytes.

use std::cell::RefCell;
use std::rc::Rc;

use hessian_core::constants::*;
use hessian_core::{ClassDef, Error, ObjectValue, OrderedMap, Result, Value};

use crate::decoder::Decoder;
use crate::state::{BinaryAccum, LenPhase, NumericKind, State, StringAccum, VectorMode};

impl Decoder {
    /// Classifies `byte` as the opener of a new value and dispatches
    /// it. Called whenever the stack is empty (top-level `BEGIN`) or a
    /// frame explicitly expects a nested value (vector/map elements,
    /// object fields).
    pub(crate) fn dispatch_begin(&mut self, byte: u8) -> Result<()> {
        match byte {
            NULL => self.emit(Value::Null),
            TRUE => self.emit(Value::Bool(true)),
            FALSE => self.emit(Value::Bool(false)),

            INT32_DIRECT_MIN..=INT32_DIRECT_MAX => {
                self.emit(Value::Int(byte as i32 - INT32_DIRECT_OFFSET))
            }
            INT32_BYTE_MIN..=INT32_BYTE_MAX => {
                let hi = byte as i32 - INT32_BYTE_OFFSET;
                self.push_numeric(NumericKind::Int32Two { hi })
            }
            INT32_SHORT_MIN..=INT32_SHORT_MAX => {
                let hi = byte as i32 - INT32_SHORT_OFFSET;
                self.push_numeric(NumericKind::Int32Three { hi })
            }
            INT32 => self.push_numeric(NumericKind::Int32Four),

            INT64_DIRECT_MIN..=INT64_DIRECT_MAX => {
                self.emit(Value::Long(byte as i64 - INT64_DIRECT_OFFSET))
            }
            INT64_BYTE_MIN..=INT64_BYTE_MAX => {
                let hi = byte as i64 - INT64_BYTE_OFFSET;
                self.push_numeric(NumericKind::Int64Two { hi })
            }
            INT64_SHORT_MIN..=INT64_SHORT_MAX => {
                let hi = byte as i64 - INT64_SHORT_OFFSET;
                self.push_numeric(NumericKind::Int64Three { hi })
            }
            INT64_INT => self.push_numeric(NumericKind::Int64FourAsLong),
            INT64 => self.push_numeric(NumericKind::Int64Eight),

            DOUBLE_ZERO => self.emit(Value::Double(0.0)),
            DOUBLE_ONE => self.emit(Value::Double(1.0)),
            DOUBLE_BYTE => self.push_numeric(NumericKind::DoubleByte),
            DOUBLE_SHORT => self.push_numeric(NumericKind::DoubleShort),
            DOUBLE_FLOAT => self.push_numeric(NumericKind::DoubleFloat),
            DOUBLE => self.push_numeric(NumericKind::DoubleFull),

            TIMESTAMP_MILLIS => self.push_numeric(NumericKind::TimestampMillis),
            TIMESTAMP_MINUTES => self.push_numeric(NumericKind::TimestampMinutes),

            STRING_COMPACT_MIN..=STRING_COMPACT_MAX => {
                self.push_string_compact((byte - STRING_COMPACT_MIN) as usize)
            }
            STRING_SHORT_MIN..=STRING_SHORT_MAX => {
                self.push_string_short(((byte - STRING_SHORT_MIN) as usize) << 8)
            }
            STRING_CHUNK => self.push_string_chunk(false),
            STRING_CHUNK_FINAL => self.push_string_chunk(true),

            BINARY_COMPACT_MIN..=BINARY_COMPACT_MAX => {
                self.push_binary_compact((byte - BINARY_COMPACT_MIN) as usize)
            }
            BINARY_SHORT_MIN..=BINARY_SHORT_MAX => {
                self.push_binary_short(((byte - BINARY_SHORT_MIN) as usize) << 8)
            }
            BINARY_CHUNK => self.push_binary_chunk(false),
            BINARY_CHUNK_FINAL => self.push_binary_chunk(true),

            VECTOR_TYPED_STREAMED => {
                self.push_vector_streamed()?;
                self.stack.push(State::CollectionType)
            }
            VECTOR_TYPED_FIXED => {
                self.push_vector_fixed_pending()?;
                self.stack.push(State::VectorSize)?;
                self.stack.push(State::CollectionType)
            }
            VECTOR_STREAMED => self.push_vector_streamed(),
            VECTOR_FIXED => {
                self.push_vector_fixed_pending()?;
                self.stack.push(State::VectorSize)
            }
            VECTOR_TYPED_FIXED_COMPACT_MIN..=VECTOR_TYPED_FIXED_COMPACT_MAX => {
                let size = (byte - VECTOR_TYPED_FIXED_COMPACT_MIN) as usize;
                self.push_vector_fixed_known(size, false)?;
                self.stack.push(State::CollectionType)
            }
            VECTOR_FIXED_COMPACT_MIN..=VECTOR_FIXED_COMPACT_MAX => {
                let size = (byte - VECTOR_FIXED_COMPACT_MIN) as usize;
                self.push_vector_fixed_known(size, true)
            }

            MAP_TYPED => {
                self.push_map()?;
                self.stack.push(State::CollectionType)
            }
            MAP_UNTYPED => self.push_map(),

            CLASS_DEFINITION => self.begin_class_definition(),

            OBJECT_INSTANCE => self.stack.push(State::ObjectInstanceType),
            OBJECT_INSTANCE_COMPACT_MIN..=OBJECT_INSTANCE_COMPACT_MAX => {
                let index = (byte - OBJECT_INSTANCE_COMPACT_MIN) as i32;
                self.begin_object_instance(index)
            }

            REFERENCE => self.stack.push(State::Reference),

            TERMINATOR => {
                // A terminator is only ever consumed explicitly by the
                // VECTOR/MAP_KEY handlers in `feed_byte`; reaching
                // `dispatch_begin` with one means no frame was
                // expecting it.
                Err(Error::InvalidOpcode { byte })
            }

            _ => Err(Error::InvalidOpcode { byte }),
        }
    }

    /// Strict variant accepting only int32 openers (`§4.6`): used by
    /// `VECTOR_SIZE`, `REFERENCE`, `CLASS_DEFINITION_SIZE`, and
    /// `OBJECT_INSTANCE_TYPE`. Opcodes in the 64-bit-int range are
    /// deliberately rejected here even though they decode to a
    /// well-formed integer-ish value elsewhere.
    pub(crate) fn dispatch_begin_int_strict(&mut self, byte: u8, context: &'static str) -> Result<()> {
        if !is_int32_opener(byte) {
            return Err(Error::InvalidStrictOpcode {
                byte,
                context,
                expected: "int32",
            });
        }
        self.dispatch_begin(byte)
    }

    /// Strict variant accepting only string openers: used by
    /// `CLASS_DEFINITION_NAME` and `CLASS_DEFINITION_FIELD`.
    pub(crate) fn dispatch_begin_string_strict(&mut self, byte: u8, context: &'static str) -> Result<()> {
        if !is_string_opener(byte) {
            return Err(Error::InvalidStrictOpcode {
                byte,
                context,
                expected: "string",
            });
        }
        self.dispatch_begin(byte)
    }

    /// Strict variant for `COLLECTION_TYPE`: a string or an int32, and
    /// nothing else.
    pub(crate) fn dispatch_begin_string_or_int_strict(&mut self, byte: u8) -> Result<()> {
        if !is_string_opener(byte) && !is_int32_opener(byte) {
            return Err(Error::InvalidStrictOpcode {
                byte,
                context: "collection type",
                expected: "string or int32",
            });
        }
        self.dispatch_begin(byte)
    }

    pub(crate) fn push_numeric(&mut self, kind: NumericKind) -> Result<()> {
        self.stack.push(State::Numeric {
            kind,
            buf: Vec::with_capacity(kind.needed()),
        })
    }

    fn push_string_compact(&mut self, len: usize) -> Result<()> {
        if len == 0 {
            self.emit(Value::String(String::new()))
        } else {
            self.stack.push(State::Str(StringAccum {
                phase: LenPhase::ReadingPayload {
                    expected: len,
                    buf: Vec::with_capacity(len),
                },
                prefix: String::new(),
                is_final: true,
            }))
        }
    }

    fn push_string_short(&mut self, base: usize) -> Result<()> {
        self.stack.push(State::Str(StringAccum {
            phase: LenPhase::ReadingLen {
                base,
                buf: Vec::new(),
                needed: 1,
            },
            prefix: String::new(),
            is_final: true,
        }))
    }

    fn push_string_chunk(&mut self, is_final: bool) -> Result<()> {
        self.stack.push(State::Str(StringAccum {
            phase: LenPhase::ReadingLen {
                base: 0,
                buf: Vec::new(),
                needed: 2,
            },
            prefix: String::new(),
            is_final,
        }))
    }

    fn push_binary_compact(&mut self, len: usize) -> Result<()> {
        if len == 0 {
            self.emit(Value::Binary(bytes::Bytes::new()))
        } else {
            self.stack.push(State::Bin(BinaryAccum {
                phase: LenPhase::ReadingPayload {
                    expected: len,
                    buf: Vec::with_capacity(len),
                },
                prefix: Vec::new(),
                is_final: true,
            }))
        }
    }

    fn push_binary_short(&mut self, base: usize) -> Result<()> {
        self.stack.push(State::Bin(BinaryAccum {
            phase: LenPhase::ReadingLen {
                base,
                buf: Vec::new(),
                needed: 1,
            },
            prefix: Vec::new(),
            is_final: true,
        }))
    }

    fn push_binary_chunk(&mut self, is_final: bool) -> Result<()> {
        self.stack.push(State::Bin(BinaryAccum {
            phase: LenPhase::ReadingLen {
                base: 0,
                buf: Vec::new(),
                needed: 2,
            },
            prefix: Vec::new(),
            is_final,
        }))
    }

    fn register_vector(&mut self, items: Rc<RefCell<Vec<Value>>>) -> Value {
        let value = Value::Vector(items);
        self.reftable.register(value.clone());
        value
    }

    fn push_vector_streamed(&mut self) -> Result<()> {
        let items = Rc::new(RefCell::new(Vec::new()));
        self.register_vector(Rc::clone(&items));
        self.stack.push(State::Vector {
            items,
            mode: VectorMode::Streamed,
        })
    }

    fn push_vector_fixed_pending(&mut self) -> Result<()> {
        let items = Rc::new(RefCell::new(Vec::new()));
        self.register_vector(Rc::clone(&items));
        self.stack.push(State::Vector {
            items,
            mode: VectorMode::FixedPending,
        })
    }

    /// `emit_if_empty` distinguishes the two compact fixed-vector
    /// opcode rows: the untyped form (`[0x78..0x7f]`) emits an empty
    /// vector immediately when `size == 0`; the typed form
    /// (`[0x70..0x77]`) always pushes a frame first because a
    /// `COLLECTION_TYPE` byte still has to be read and discarded, and
    /// lets `emit`'s `CollectionType` handling complete it afterward.
    fn push_vector_fixed_known(&mut self, size: usize, emit_if_empty: bool) -> Result<()> {
        let items = Rc::new(RefCell::new(Vec::with_capacity(size)));
        let value = self.register_vector(Rc::clone(&items));
        if size == 0 && emit_if_empty {
            self.emit(value)
        } else {
            self.stack.push(State::Vector {
                items,
                mode: VectorMode::Fixed(size),
            })
        }
    }

    fn push_map(&mut self) -> Result<()> {
        let map = Rc::new(RefCell::new(OrderedMap::new()));
        let value = Value::Map(Rc::clone(&map));
        self.reftable.register(value);
        self.stack.push(State::MapKey { map })
    }

    fn begin_class_definition(&mut self) -> Result<()> {
        let def = Rc::new(RefCell::new(ClassDef::default()));
        self.classtable.register(Rc::clone(&def));
        self.stack.push(State::ClassDefName(def))
    }

    pub(crate) fn begin_object_instance(&mut self, index: i32) -> Result<()> {
        let def = self.classtable.get(index)?;
        let (class_name, field_count) = {
            let borrowed = def.borrow();
            (borrowed.name.clone(), borrowed.fields.len())
        };
        let obj = Rc::new(RefCell::new(ObjectValue::new(class_name)));
        let value = Value::Object(Rc::clone(&obj));
        self.reftable.register(value.clone());
        if field_count == 0 {
            self.emit(value)
        } else {
            self.stack.push(State::ObjectInstanceField {
                obj,
                definition: def,
                next_index: 0,
            })
        }
    }
}

fn is_int32_opener(byte: u8) -> bool {
    matches!(
        byte,
        INT32_DIRECT_MIN..=INT32_DIRECT_MAX
            | INT32_BYTE_MIN..=INT32_BYTE_MAX
            | INT32_SHORT_MIN..=INT32_SHORT_MAX
    ) || byte == INT32
}

fn is_string_opener(byte: u8) -> bool {
    matches!(byte, STRING_COMPACT_MIN..=STRING_COMPACT_MAX | STRING_SHORT_MIN..=STRING_SHORT_MAX)
        || byte == STRING_CHUNK
        || byte == STRING_CHUNK_FINAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;

    #[test]
    fn rejects_byte_not_in_opcode_table_at_begin() {
        let mut dec = Decoder::new();
        // 0x3a is unassigned in the opcode table.
        let err = dec.feed(&[0x3a]).unwrap_err();
        assert!(matches!(err, Error::InvalidOpcode { byte: 0x3a }));
    }

    #[test]
    fn int_strict_rejects_int64_range() {
        let mut dec = Decoder::new();
        // 'Q' (REFERENCE) expects an int32-strict opener; 0x38 is an
        // int64-short opener and must be rejected here.
        let err = dec.feed(&[REFERENCE, 0x38]).unwrap_err();
        assert!(matches!(err, Error::InvalidStrictOpcode { byte: 0x38, .. }));
    }

    #[test]
    fn string_strict_rejects_non_string_opener() {
        let mut dec = Decoder::new();
        let err = dec.feed(&[CLASS_DEFINITION, NULL]).unwrap_err();
        assert!(matches!(err, Error::InvalidStrictOpcode { byte, .. } if byte == NULL));
    }
}
