//! The decode-cycle reference table.
//!
//! Every composite (vector, map, object instance) is appended here the
//! moment it is created — before its contents are decoded — so a
//! later back-reference (`0x51`/`'Q'`) can resolve to it even while it
//! is still being populated. This is what makes cyclic and shared
//! object graphs representable at all.

use hessian_core::{Error, Result, Value};

#[derive(Default)]
pub(crate) struct RefTable {
    entries: Vec<Value>,
}

impl RefTable {
    pub(crate) fn new() -> Self {
        RefTable {
            entries: Vec::new(),
        }
    }

    /// Registers a newly created composite, returning its stable index.
    pub(crate) fn register(&mut self, value: Value) -> usize {
        debug_assert!(value.is_composite(), "only composites are registered");
        self.entries.push(value);
        self.entries.len() - 1
    }

    /// Resolves a back-reference index. The returned `Value` is a
    /// cheap `Rc` clone, so mutations to the original (e.g. an
    /// object instance still being populated) are observed through it.
    pub(crate) fn get(&self, index: i32) -> Result<Value> {
        if index < 0 {
            return Err(Error::NegativeLength { value: index });
        }
        self.entries
            .get(index as usize)
            .cloned()
            .ok_or(Error::BackReferenceOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
