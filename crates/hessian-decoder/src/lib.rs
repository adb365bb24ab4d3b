//! An incremental, byte-oriented decoder for the Hessian 2.0 binary
//! serialization format.
//!
//! The decoder is a pushdown automaton: [`Decoder::feed`] accepts
//! input in arbitrary increments — down to a single byte at a time —
//! without ever buffering a complete message, and [`Decoder::finalize`]
//! returns the single decoded [`hessian_core::Value`] once the
//! top-level value is complete.
//!
//! ```
//! use hessian_decoder::Decoder;
//!
//! let mut dec = Decoder::new();
//! dec.feed(&[0x03, b'f', b'o', b'o']).unwrap();
//! let value = dec.finalize().unwrap();
//! assert_eq!(value.as_str(), Some("foo"));
//! ```

mod accumulate;
mod classtable;
pub mod config;
pub mod decoder;
mod dispatch;
mod emit;
mod reftable;
mod stack;
mod state;

pub use config::DecoderConfig;
pub use decoder::Decoder;
pub use hessian_core::{Error, ObjectValue, OrderedMap, Result, Value};
