//! The decoder driver: `reset`/`feed`/`finalize` and the per-byte
//! routing that decides whether the current top frame wants a raw
//! accumulator byte, a terminator, or a fresh `BEGIN`-dispatched value.

use hessian_core::constants::TERMINATOR;
use hessian_core::{Error, Result, Value};

use crate::classtable::ClassTable;
use crate::config::DecoderConfig;
use crate::reftable::RefTable;
use crate::stack::ParseStack;
use crate::state::{State, VectorMode};

/// An incremental Hessian 2.0 decoder.
///
/// Bytes are fed in arbitrary increments via [`Decoder::feed`]; no
/// full message is ever buffered. [`Decoder::finalize`] returns the
/// single top-level value once the stream is complete, and resets the
/// decoder for reuse. A decoder that encounters a decode error is
/// *poisoned*: every subsequent call fails with [`Error::Poisoned`]
/// until [`Decoder::reset`] is called explicitly.
///
/// `Decoder` holds `Rc`/`RefCell` composites internally (see
/// [`hessian_core::Value`]) and is therefore `!Send`/`!Sync` by
/// construction — sharing one decoder across threads requires external
/// synchronization the type itself does not provide.
///
/// # Examples
///
/// ```
/// use hessian_decoder::Decoder;
///
/// let mut dec = Decoder::new();
/// dec.feed(&[0x90]).unwrap(); // compact int32 for 0
/// let value = dec.finalize().unwrap();
/// assert_eq!(value.as_int(), Some(0));
/// ```
///
/// Feeding arbitrary byte partitions produces the same result
/// (incrementality, `§8`):
///
/// ```
/// use hessian_decoder::Decoder;
///
/// let mut dec = Decoder::new();
/// dec.feed(&[0x57, 0x90]).unwrap(); // streamed vector opener + one element
/// dec.feed(&[0x91]).unwrap(); // second element
/// dec.feed(&[0x5a]).unwrap(); // terminator
/// let value = dec.finalize().unwrap();
/// ```
pub struct Decoder {
    pub(crate) config: DecoderConfig,
    pub(crate) stack: ParseStack,
    pub(crate) reftable: RefTable,
    pub(crate) classtable: ClassTable,
    pub(crate) final_value: Option<Value>,
    pub(crate) poisoned: bool,
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        let stack = ParseStack::new(config.max_stack_depth);
        Decoder {
            config,
            stack,
            reftable: RefTable::new(),
            classtable: ClassTable::new(),
            final_value: None,
            poisoned: false,
        }
    }

    /// Clears the stack, both tables, and any pending final value.
    /// Idempotent; also called implicitly by a successful `finalize`.
    pub fn reset(&mut self) {
        tracing::debug!("resetting decoder");
        self.stack.clear();
        self.reftable.clear();
        self.classtable.clear();
        self.final_value = None;
        self.poisoned = false;
    }

    /// Feeds a contiguous slice of encoded bytes. May be called
    /// repeatedly with arbitrarily small slices — even a single byte
    /// at a time — without changing the resulting decoded value.
    ///
    /// Once any byte produces an error, the decoder is poisoned: this
    /// and all further calls return that same class of error until
    /// [`Decoder::reset`] is called.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<()> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        for &byte in bytes {
            if let Err(err) = self.feed_byte(byte) {
                self.poisoned = true;
                tracing::warn!(byte = format!("0x{byte:02x}"), %err, "decode failed");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Returns the decoded top-level value and resets the decoder.
    ///
    /// Fails if the parse stack is non-empty (a value is still
    /// in-progress) or if no top-level value has been produced yet.
    pub fn finalize(&mut self) -> Result<Value> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        if !self.stack.is_empty() {
            return Err(Error::UnexpectedEndOfStream {
                depth: self.stack.len(),
            });
        }
        let value = self.final_value.take().ok_or(Error::NoValueProduced)?;
        tracing::debug!("decode finalized");
        self.reset();
        Ok(value)
    }

    fn feed_byte(&mut self, byte: u8) -> Result<()> {
        let action = match self.stack.top() {
            None => Lookahead::Begin,
            Some(State::Numeric { .. }) => Lookahead::Numeric,
            Some(State::Str(_)) => Lookahead::Str,
            Some(State::Bin(_)) => Lookahead::Bin,
            Some(State::Vector {
                mode: VectorMode::Streamed,
                ..
            }) => Lookahead::VectorStreamed,
            Some(State::Vector { .. }) => Lookahead::Begin,
            Some(State::MapKey { .. }) => Lookahead::MapKey,
            Some(State::MapValue { .. }) => Lookahead::Begin,
            Some(State::CollectionType) => Lookahead::CollectionType,
            Some(State::VectorSize) => Lookahead::IntStrict("vector size"),
            Some(State::Reference) => Lookahead::IntStrict("back-reference index"),
            Some(State::ClassDefSize(_)) => Lookahead::IntStrict("class definition field count"),
            Some(State::ObjectInstanceType) => {
                Lookahead::IntStrict("object instance class index")
            }
            Some(State::ClassDefName(_)) => Lookahead::StringStrict("class definition name"),
            Some(State::ClassDefField { .. }) => {
                Lookahead::StringStrict("class definition field name")
            }
            Some(State::ObjectInstanceField { .. }) => Lookahead::Begin,
        };

        match action {
            Lookahead::Begin => self.dispatch_begin(byte),
            Lookahead::Numeric => self.accumulate_numeric(byte),
            Lookahead::Str => self.accumulate_string(byte),
            Lookahead::Bin => self.accumulate_binary(byte),
            Lookahead::VectorStreamed => {
                if byte == TERMINATOR {
                    self.pop_and_emit_streamed_vector()
                } else {
                    self.dispatch_begin(byte)
                }
            }
            Lookahead::MapKey => {
                if byte == TERMINATOR {
                    self.pop_and_emit_map()
                } else {
                    self.dispatch_begin(byte)
                }
            }
            Lookahead::CollectionType => self.dispatch_begin_string_or_int_strict(byte),
            Lookahead::IntStrict(context) => self.dispatch_begin_int_strict(byte, context),
            Lookahead::StringStrict(context) => self.dispatch_begin_string_strict(byte, context),
        }
    }

    fn pop_and_emit_streamed_vector(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(State::Vector {
                items,
                mode: VectorMode::Streamed,
            }) => self.emit(Value::Vector(items)),
            _ => unreachable!("VectorStreamed lookahead guarantees a streamed vector on top"),
        }
    }

    fn pop_and_emit_map(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(State::MapKey { map }) => self.emit(Value::Map(map)),
            _ => unreachable!("MapKey lookahead guarantees a MapKey frame on top"),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// What the current top frame expects of the next byte. Computed once
/// per `feed_byte` and then matched on without holding a borrow of
/// `self.stack`, since most arms need `&mut self` to act on it.
enum Lookahead {
    Begin,
    Numeric,
    Str,
    Bin,
    VectorStreamed,
    MapKey,
    CollectionType,
    IntStrict(&'static str),
    StringStrict(&'static str),
}
