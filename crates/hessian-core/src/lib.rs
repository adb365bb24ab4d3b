pub mod constants;
pub mod error;
pub mod value;

pub use error::{Error, Result};
pub use value::{ClassDef, ObjectValue, OrderedMap, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn scalar_equality_is_structural() {
        assert_eq!(Value::Int(5), Value::Int(5));
        assert_ne!(Value::Int(5), Value::Int(6));
        assert_ne!(Value::Int(5), Value::Long(5));
    }

    #[test]
    fn composite_equality_is_pointer_identity() {
        let a = Value::new_vector();
        let b = Value::new_vector();
        assert_ne!(a, b, "two distinct empty vectors are not equal");
        assert_eq!(a.clone(), a, "cloning shares the Rc, so it compares equal");
    }

    #[test]
    fn ordered_map_tolerates_composite_keys_without_recursing() {
        let key = Value::new_vector();
        if let Value::Vector(v) = &key {
            v.borrow_mut().push(key.clone());
        }
        let mut map = OrderedMap::new();
        map.insert(key.clone(), Value::String("ok".into()));
        assert_eq!(map.get(&key), Some(&Value::String("ok".into())));
    }

    #[test]
    fn debug_does_not_recurse_into_a_self_referential_vector() {
        let v = Value::new_vector();
        if let Value::Vector(inner) = &v {
            inner.borrow_mut().push(v.clone());
        }
        let rendered = format!("{v:?}");
        assert!(rendered.starts_with("Vector(len=1"));
    }

    #[test]
    fn object_value_holds_fields_in_insertion_order() {
        let obj = Rc::new(std::cell::RefCell::new(ObjectValue::new("Point".into())));
        obj.borrow_mut().fields.insert("x".into(), Value::Int(1));
        obj.borrow_mut().fields.insert("y".into(), Value::Int(2));
        let keys: Vec<_> = obj.borrow().fields.keys().cloned().collect();
        assert_eq!(keys, vec!["x".to_string(), "y".to_string()]);
    }
}
