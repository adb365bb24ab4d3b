//! Emit dispatch (`§4.7`): what happens when a sub-parser completes.
//!
//! The action is keyed on the frame *below* the one that just
//! completed — that frame's state is the continuation. Several
//! continuations themselves complete with no further bytes needed
//! (resolving a back-reference, finishing a class definition, closing
//! out a zero-sized fixed vector), so this is a loop: each iteration
//! pops one frame and either returns, or produces a new value that
//! must be re-emitted to whatever is now on top.

use hessian_core::{Error, Result, Value};

use crate::decoder::Decoder;
use crate::state::{State, VectorMode};

impl Decoder {
    pub(crate) fn emit(&mut self, value: Value) -> Result<()> {
        let mut value = value;
        loop {
            match self.stack.pop() {
                None => {
                    self.final_value = Some(value);
                    return Ok(());
                }

                Some(State::Vector {
                    items,
                    mode: VectorMode::Streamed,
                }) => {
                    items.borrow_mut().push(value);
                    self.stack.push(State::Vector {
                        items,
                        mode: VectorMode::Streamed,
                    })?;
                    return Ok(());
                }

                Some(State::Vector {
                    items,
                    mode: VectorMode::Fixed(n),
                }) => {
                    items.borrow_mut().push(value);
                    if items.borrow().len() == n {
                        value = Value::Vector(items);
                        continue;
                    }
                    self.stack.push(State::Vector {
                        items,
                        mode: VectorMode::Fixed(n),
                    })?;
                    return Ok(());
                }

                Some(State::Vector {
                    mode: VectorMode::FixedPending,
                    ..
                }) => {
                    unreachable!("a FixedPending vector never sits directly below a completed sub-parser; VECTOR_SIZE always completes first")
                }

                Some(State::VectorSize) => {
                    let size = expect_usize(&value, "vector size")?;
                    match self.stack.pop() {
                        Some(State::Vector {
                            items,
                            mode: VectorMode::FixedPending,
                        }) => {
                            if size == 0 {
                                value = Value::Vector(items);
                                continue;
                            }
                            self.stack.push(State::Vector {
                                items,
                                mode: VectorMode::Fixed(size),
                            })?;
                            return Ok(());
                        }
                        _ => unreachable!("VECTOR_SIZE is always pushed directly above a FixedPending vector"),
                    }
                }

                Some(State::MapKey { map }) => {
                    self.stack.push(State::MapValue { map, key: value })?;
                    return Ok(());
                }

                Some(State::MapValue { map, key }) => {
                    map.borrow_mut().insert(key, value);
                    self.stack.push(State::MapKey { map })?;
                    return Ok(());
                }

                Some(State::CollectionType) => {
                    // The type name/index is discarded entirely; the
                    // data model carries no collection type.
                    if let Some(State::Vector {
                        mode: VectorMode::Fixed(0),
                        ..
                    }) = self.stack.top()
                    {
                        if let Some(State::Vector { items, .. }) = self.stack.pop() {
                            value = Value::Vector(items);
                            continue;
                        }
                    }
                    return Ok(());
                }

                Some(State::ClassDefName(def)) => {
                    let name = value
                        .into_string()
                        .ok_or(Error::UnexpectedValueType { expected: "string" })?;
                    def.borrow_mut().name = name;
                    self.stack.push(State::ClassDefSize(def))?;
                    return Ok(());
                }

                Some(State::ClassDefSize(def)) => {
                    let count = expect_usize(&value, "class definition field count")?;
                    if count == 0 {
                        return Ok(());
                    }
                    self.stack.push(State::ClassDefField {
                        def,
                        remaining: count,
                    })?;
                    return Ok(());
                }

                Some(State::ClassDefField { def, remaining }) => {
                    let field_name = value
                        .into_string()
                        .ok_or(Error::UnexpectedValueType { expected: "string" })?;
                    def.borrow_mut().fields.push(field_name);
                    let remaining = remaining - 1;
                    if remaining == 0 {
                        return Ok(());
                    }
                    self.stack.push(State::ClassDefField { def, remaining })?;
                    return Ok(());
                }

                Some(State::ObjectInstanceType) => {
                    let index = expect_int(&value, "object instance class index")?;
                    return self.begin_object_instance(index);
                }

                Some(State::ObjectInstanceField {
                    obj,
                    definition,
                    next_index,
                }) => {
                    let field_name = definition.borrow().fields[next_index].clone();
                    obj.borrow_mut().fields.insert(field_name, value);
                    let next_index = next_index + 1;
                    if next_index == definition.borrow().fields.len() {
                        value = Value::Object(obj);
                        continue;
                    }
                    self.stack.push(State::ObjectInstanceField {
                        obj,
                        definition,
                        next_index,
                    })?;
                    return Ok(());
                }

                Some(State::Reference) => {
                    let index = expect_int(&value, "back-reference index")?;
                    value = self.reftable.get(index)?;
                    continue;
                }

                Some(other @ (State::Numeric { .. } | State::Str(_) | State::Bin(_))) => {
                    unreachable!(
                        "{other:?} is a raw-byte accumulator, not an emit continuation — it should have popped itself before calling emit()"
                    )
                }
            }
        }
    }
}

/// Class-definition and object-instance indices, vector sizes, and
/// back-reference indices are always plain `Int`, never `Long` — the
/// strict int32 sub-dispatcher (`§4.6`) guarantees this at the opcode
/// level, so this is an internal consistency check, not user input
/// validation.
fn expect_int(value: &Value, what: &'static str) -> Result<i32> {
    value.as_int().ok_or(Error::UnexpectedValueType { expected: what })
}

/// Like `expect_int`, but for sites that index a `Vec`/count down a
/// `usize` (vector size, class-definition field count) rather than
/// look something up by signed index. A negative length here would
/// otherwise silently wrap to a huge `usize` under a bare `as` cast.
fn expect_usize(value: &Value, what: &'static str) -> Result<usize> {
    let raw = expect_int(value, what)?;
    usize::try_from(raw).map_err(|_| Error::NegativeLength { value: raw })
}

#[cfg(test)]
mod tests {
    use crate::decoder::Decoder;
    use hessian_core::Error;

    #[test]
    fn negative_vector_size_is_rejected_instead_of_wrapping() {
        // 'X' (VECTOR_FIXED) followed by compact int32 -16 as the size.
        let mut dec = Decoder::new();
        let err = dec.feed(&[0x58, 0x80]).unwrap_err();
        assert!(matches!(err, Error::NegativeLength { value: -16 }));
    }

    #[test]
    fn negative_class_definition_field_count_is_rejected() {
        // 'C' "x" (1-char compact string), then compact int32 -16 as the field count.
        let mut dec = Decoder::new();
        let err = dec.feed(&[b'C', 0x01, b'x', 0x80]).unwrap_err();
        assert!(matches!(err, Error::NegativeLength { value: -16 }));
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            State::Numeric { .. } => "Numeric",
            State::Str(_) => "Str",
            State::Bin(_) => "Bin",
            State::CollectionType => "CollectionType",
            State::VectorSize => "VectorSize",
            State::Reference => "Reference",
            State::ClassDefName(_) => "ClassDefName",
            State::ClassDefSize(_) => "ClassDefSize",
            State::ClassDefField { .. } => "ClassDefField",
            State::ObjectInstanceType => "ObjectInstanceType",
            State::ObjectInstanceField { .. } => "ObjectInstanceField",
            State::Vector { .. } => "Vector",
            State::MapKey { .. } => "MapKey",
            State::MapValue { .. } => "MapValue",
        };
        f.write_str(name)
    }
}
