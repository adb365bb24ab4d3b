//! The decode-cycle class-definition table.
//!
//! Independent of [`crate::reftable::RefTable`]: class definitions are
//! a parse-time side effect with no value identity of their own. They
//! are registered the moment a `'C'` opcode's frame is pushed, and
//! looked up by 0-based index when an object instance cites one.

use std::cell::RefCell;
use std::rc::Rc;

use hessian_core::{ClassDef, Error, Result};

#[derive(Default)]
pub(crate) struct ClassTable {
    entries: Vec<Rc<RefCell<ClassDef>>>,
}

impl ClassTable {
    pub(crate) fn new() -> Self {
        ClassTable {
            entries: Vec::new(),
        }
    }

    pub(crate) fn register(&mut self, def: Rc<RefCell<ClassDef>>) -> usize {
        self.entries.push(def);
        self.entries.len() - 1
    }

    pub(crate) fn get(&self, index: i32) -> Result<Rc<RefCell<ClassDef>>> {
        if index < 0 {
            return Err(Error::NegativeLength { value: index });
        }
        self.entries
            .get(index as usize)
            .cloned()
            .ok_or(Error::ClassDefinitionOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup_by_definition_order() {
        let mut table = ClassTable::new();
        let a = Rc::new(RefCell::new(ClassDef {
            name: "A".into(),
            fields: vec![],
        }));
        let b = Rc::new(RefCell::new(ClassDef {
            name: "B".into(),
            fields: vec!["x".into()],
        }));
        assert_eq!(table.register(a), 0);
        assert_eq!(table.register(b), 1);
        assert_eq!(table.get(1).unwrap().borrow().name, "B");
    }

    #[test]
    fn out_of_range_lookup_fails() {
        let table = ClassTable::new();
        assert!(matches!(
            table.get(0),
            Err(Error::ClassDefinitionOutOfRange { index: 0, len: 0 })
        ));
    }
}
