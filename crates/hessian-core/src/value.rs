use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// A decoded Hessian value.
///
/// Scalars are plain owned data. Composites (`Vector`, `Map`, `Object`)
/// are `Rc<RefCell<_>>` so that a back-reference produced later in the
/// stream can share the *same* allocation as the value it points to —
/// including while that allocation is still being populated, which is
/// what makes self-referential graphs representable at all. Cloning a
/// `Value` is always cheap: scalars clone their (small) payload,
/// composites clone the `Rc` handle.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    Binary(Bytes),
    Date(DateTime<Utc>),
    Vector(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<OrderedMap>>),
    Object(Rc<RefCell<ObjectValue>>),
}

impl Value {
    pub fn new_vector() -> Value {
        Value::Vector(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn new_vector_with_capacity(capacity: usize) -> Value {
        Value::Vector(Rc::new(RefCell::new(Vec::with_capacity(capacity))))
    }

    pub fn new_map() -> Value {
        Value::Map(Rc::new(RefCell::new(OrderedMap::new())))
    }

    pub fn new_object(class_name: String) -> Value {
        Value::Object(Rc::new(RefCell::new(ObjectValue::new(class_name))))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Vector(_) | Value::Map(_) | Value::Object(_))
    }

    /// Returns the payload of an `Int`, if this is one. Hessian never
    /// widens a 32-bit integer to `Long` implicitly, so this does not
    /// accept `Value::Long`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Identity for composites is pointer identity, not structural
/// equality: two separately-built vectors with the same contents are
/// different values, exactly as two separately-allocated `Rc`s are.
/// Comparing contents requires borrowing through to the inner
/// collection explicitly.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// An ordered Hessian map.
///
/// Hessian map keys may themselves be composite values, which rules out
/// a `HashMap`/`IndexMap`-backed representation: hashing (or even
/// structurally comparing) a key that is, or contains, a cyclic `Rc`
/// graph can recurse forever. `OrderedMap` instead keeps entries in a
/// plain `Vec` and relies on [`Value`]'s pointer-identity equality for
/// composite keys, which is O(1) and never recurses into the key's
/// contents. Lookup is O(n) in the number of entries, which is the
/// price of supporting arbitrary key types safely.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap {
    entries: Vec<(Value, Value)>,
}

impl OrderedMap {
    pub fn new() -> Self {
        OrderedMap {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts a key/value pair, overwriting the value of an existing
    /// equal key in place so iteration order follows first insertion,
    /// matching how a streamed Hessian map is built key-by-key.
    pub fn insert(&mut self, key: Value, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> {
        self.entries.iter()
    }
}

/// A decoded object instance: its class name and fields in declaration
/// order. Field names are always plain strings, so an `IndexMap` is
/// safe here (unlike [`OrderedMap`], which must tolerate composite
/// keys).
#[derive(Debug, Clone)]
pub struct ObjectValue {
    pub class_name: String,
    pub fields: IndexMap<String, Value>,
}

impl ObjectValue {
    pub fn new(class_name: String) -> Self {
        ObjectValue {
            class_name,
            fields: IndexMap::new(),
        }
    }
}

/// A class definition registered by a `C` opcode: the class name and
/// the ordered list of field names later object instances referencing
/// this definition will populate positionally.
#[derive(Debug, Clone, Default)]
pub struct ClassDef {
    pub name: String,
    pub fields: Vec<String>,
}

/// A derived `Debug` would recurse into composite contents, which is
/// unsound for a self-referential graph — a vector containing itself
/// would overflow the stack just by being printed. This impl only
/// prints shape (length, class name, pointer) for composites; inspect
/// contents explicitly via `borrow()` when a test needs to assert on
/// them.
#[cfg(test)]
mod scalar_equality_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Null, Value::Null, true)]
    #[case(Value::Int(5), Value::Int(5), true)]
    #[case(Value::Int(5), Value::Int(6), false)]
    #[case(Value::Int(5), Value::Long(5), false)]
    #[case(Value::String("a".into()), Value::String("a".into()), true)]
    #[case(Value::String("a".into()), Value::String("b".into()), false)]
    fn scalar_pairs_compare_structurally(
        #[case] left: Value,
        #[case] right: Value,
        #[case] expected: bool,
    ) {
        assert_eq!(left == right, expected);
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(i) => write!(f, "Int({i})"),
            Value::Long(l) => write!(f, "Long({l})"),
            Value::Double(d) => write!(f, "Double({d})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Binary(b) => write!(f, "Binary({} bytes)", b.len()),
            Value::Date(d) => write!(f, "Date({d})"),
            Value::Vector(v) => {
                write!(f, "Vector(len={}, at={:p})", v.borrow().len(), Rc::as_ptr(v))
            }
            Value::Map(m) => {
                write!(f, "Map(len={}, at={:p})", m.borrow().len(), Rc::as_ptr(m))
            }
            Value::Object(o) => {
                let obj = o.borrow();
                write!(
                    f,
                    "Object(class={:?}, fields={}, at={:p})",
                    obj.class_name,
                    obj.fields.len(),
                    Rc::as_ptr(o)
                )
            }
        }
    }
}
