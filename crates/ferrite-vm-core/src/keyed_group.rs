//! Keyed grouping over iterables
//!
//! `group_by` drives the iteration protocol, asks a callback for each
//! item's key and collects items into insertion-ordered buckets. Keys are
//! coerced either like property keys (`Object.groupBy`) or like collection
//! keys (`Map.groupBy`).

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::error::{VmError, VmResult};
use crate::iteration::{get_iterator, iterator_close, iterator_step_value};
use crate::property::{PropertyKey, PropertySlot};
use crate::realm::Realm;
use crate::value::{ObjectRef, Value, same_value_zero};

/// How callback results become bucket keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCoercion {
    /// Symbols stay, everything else is stringified
    Property,
    /// Values kept as-is, `-0` folded into `+0`
    Collection,
}

/// A value compared with SameValueZero
#[derive(Debug, Clone)]
pub struct CollectionKey(Value);

impl CollectionKey {
    /// Wrap a value, normalizing `-0`
    pub fn new(value: Value) -> Self {
        match value {
            Value::Number(n) if n == 0.0 => Self(Value::Number(0.0)),
            other => Self(other),
        }
    }

    /// The wrapped value
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Unwrap
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl PartialEq for CollectionKey {
    fn eq(&self, other: &Self) -> bool {
        same_value_zero(&self.0, &other.0)
    }
}

impl Eq for CollectionKey {}

impl Hash for CollectionKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(&self.0).hash(state);
        match &self.0 {
            Value::Undefined | Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Number(n) if n.is_nan() => f64::NAN.to_bits().hash(state),
            Value::Number(n) if *n == 0.0 => 0u64.hash(state),
            Value::Number(n) => n.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Symbol(sym) => sym.hash(state),
            Value::Object(obj) => obj.hash(state),
        }
    }
}

/// Coerced bucket key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// From [`KeyCoercion::Property`]
    Property(PropertyKey),
    /// From [`KeyCoercion::Collection`]
    Collection(CollectionKey),
}

impl GroupKey {
    /// Script value of the key
    pub fn to_value(&self) -> Value {
        match self {
            Self::Property(key) => key.to_value(),
            Self::Collection(key) => key.value().clone(),
        }
    }
}

/// Buckets in key-creation order
pub type Groups = IndexMap<GroupKey, Vec<Value>, FxBuildHasher>;

/// GroupBy(items, callback, keyCoercion)
///
/// The callback is called as `callback(item, index)` with `this`
/// undefined. Any failure after the iterator was opened closes it first.
pub fn group_by(
    realm: &mut Realm,
    items: &Value,
    callback: &Value,
    coercion: KeyCoercion,
) -> VmResult<Groups> {
    if items.is_nullish() {
        return Err(VmError::type_error(format!(
            "Cannot convert {} to object",
            items.display_string()
        )));
    }
    if !realm.is_callable(callback) {
        return Err(VmError::type_error(format!(
            "{} is not a function, it is {}.",
            callback.display_string(),
            realm.type_of(callback)
        )));
    }

    let mut record = get_iterator(realm, items)?;
    let limit = realm.config().max_iterations;
    let mut groups = Groups::default();
    let mut index: u64 = 0;

    while let Some(item) = iterator_step_value(realm, &mut record)? {
        if index > limit {
            let err = VmError::range_error("Too many values to iterate");
            return iterator_close(realm, &record, Err(err)).map(|_| groups);
        }
        let key = realm
            .call(callback, &Value::Undefined, &[item.clone(), Value::number(index as f64)])
            .and_then(|key| coerce_key(key, coercion));
        let key = match key {
            Ok(key) => key,
            Err(err) => return iterator_close(realm, &record, Err(err)).map(|_| groups),
        };
        groups.entry(key).or_default().push(item);
        index += 1;
    }
    Ok(groups)
}

fn coerce_key(key: Value, coercion: KeyCoercion) -> VmResult<GroupKey> {
    Ok(match coercion {
        KeyCoercion::Property => GroupKey::Property(PropertyKey::from_value(&key)?),
        KeyCoercion::Collection => GroupKey::Collection(CollectionKey::new(key)),
    })
}

/// `Object.groupBy` result shape: a prototype-less object whose properties
/// are arrays, in bucket order
pub fn groups_to_object(realm: &mut Realm, groups: Groups) -> ObjectRef {
    let target = realm.create_object_with_proto(None);
    for (key, values) in groups {
        let key = match key {
            GroupKey::Property(key) => key,
            GroupKey::Collection(key) => match PropertyKey::from_value(key.value()) {
                Ok(key) => key,
                Err(_) => PropertyKey::string(&key.value().display_string()),
            },
        };
        let array = realm.create_array_from_list(values);
        realm
            .object_mut(target)
            .insert_slot(key, PropertySlot::data(Value::Object(array)));
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RealmConfig;
    use std::cell::Cell;
    use std::rc::Rc;

    fn numbers(realm: &mut Realm, values: &[f64]) -> Value {
        let array = realm.create_array_from_list(values.iter().map(|n| Value::number(*n)));
        Value::Object(array)
    }

    fn identity(realm: &mut Realm) -> Value {
        let f = realm.create_native_function("id", 1, |_, _, args| Ok(args.first().cloned().unwrap_or_default()));
        Value::Object(f)
    }

    #[test]
    fn test_collection_key_equality() {
        assert_eq!(CollectionKey::new(Value::number(-0.0)), CollectionKey::new(Value::number(0.0)));
        assert_eq!(CollectionKey::new(Value::number(f64::NAN)), CollectionKey::new(Value::number(f64::NAN)));
        assert_ne!(CollectionKey::new(Value::number(1.0)), CollectionKey::new(Value::string("1")));
        assert!(matches!(
            CollectionKey::new(Value::number(-0.0)).value(),
            Value::Number(n) if n.is_sign_positive()
        ));
    }

    #[test]
    fn test_collection_coercion_keeps_types() {
        let mut realm = Realm::default();
        let items = numbers(&mut realm, &[1.0, -0.0, 0.0, f64::NAN, f64::NAN]);
        let callback = identity(&mut realm);
        let groups = group_by(&mut realm, &items, &callback, KeyCoercion::Collection).unwrap();
        assert_eq!(groups.len(), 3);
        let zero = GroupKey::Collection(CollectionKey::new(Value::number(0.0)));
        assert_eq!(groups[&zero].len(), 2);
    }

    #[test]
    fn test_property_coercion_stringifies() {
        let mut realm = Realm::default();
        let items = numbers(&mut realm, &[1.0, 2.0]);
        let callback = realm.create_native_function("k", 1, |_, _, args| {
            let n = args.first().cloned().unwrap_or_default().to_number()?;
            Ok(if n == 1.0 { Value::string("1") } else { Value::number(1.0) })
        });
        let groups = group_by(&mut realm, &items, &Value::Object(callback), KeyCoercion::Property).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&GroupKey::Property(PropertyKey::index(1))].len(), 2);
    }

    #[test]
    fn test_callback_receives_index() {
        let mut realm = Realm::default();
        let items = numbers(&mut realm, &[7.0, 8.0, 9.0]);
        let callback = realm.create_native_function("k", 2, |_, _, args| Ok(args.get(1).cloned().unwrap_or_default()));
        let groups = group_by(&mut realm, &items, &Value::Object(callback), KeyCoercion::Property).unwrap();
        let keys: Vec<_> = groups.keys().map(GroupKey::to_value).collect();
        assert_eq!(keys, vec![Value::string("0"), Value::string("1"), Value::string("2")]);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let mut realm = Realm::default();
        let callback = identity(&mut realm);
        assert!(group_by(&mut realm, &Value::Undefined, &callback, KeyCoercion::Property).is_err());
        let items = numbers(&mut realm, &[1.0]);
        let err = group_by(&mut realm, &items, &Value::number(1.0), KeyCoercion::Property).unwrap_err();
        assert!(matches!(err, VmError::TypeError(_)));
    }

    #[test]
    fn test_callback_error_closes_iterator() {
        let mut realm = Realm::default();
        let closed = Rc::new(Cell::new(false));
        let iterator = realm.create_object();
        realm.define_method(iterator, "next", "next", 0, |realm, _, _| {
            Ok(Value::Object(realm.create_iter_result_object(Value::Null, false)))
        });
        let flag = closed.clone();
        realm.define_method(iterator, "return", "return", 0, move |realm, _, _| {
            flag.set(true);
            Ok(Value::Object(realm.create_object()))
        });
        let key = PropertyKey::Symbol(realm.symbols().iterator.clone());
        realm.define_method(iterator, key, "[Symbol.iterator]", 0, |_, this, _| Ok(this.clone()));

        let callback = realm.create_native_function("k", 1, |_, _, _| Err(VmError::type_error("boom")));
        let err = group_by(&mut realm, &Value::Object(iterator), &Value::Object(callback), KeyCoercion::Property)
            .unwrap_err();
        assert!(matches!(err, VmError::TypeError(msg) if msg == "boom"));
        assert!(closed.get());
    }

    #[test]
    fn test_iteration_bound() {
        let mut realm = Realm::new(RealmConfig::new().max_iterations(1));
        let items = numbers(&mut realm, &[1.0, 2.0, 3.0]);
        let callback = identity(&mut realm);
        let err = group_by(&mut realm, &items, &callback, KeyCoercion::Collection).unwrap_err();
        assert!(matches!(err, VmError::RangeError(_)));
    }

    #[test]
    fn test_groups_to_object() {
        let mut realm = Realm::default();
        let items = numbers(&mut realm, &[1.0, 2.0, 3.0]);
        let callback = identity(&mut realm);
        let groups = group_by(&mut realm, &items, &callback, KeyCoercion::Property).unwrap();
        let obj = groups_to_object(&mut realm, groups);
        assert_eq!(realm.prototype(obj), None);
        assert_eq!(realm.own_keys(obj, false, false).len(), 3);
        let bucket = realm.get(obj, 2u32).unwrap().as_object().unwrap();
        assert_eq!(realm.get(bucket, 0u32).unwrap(), Value::number(2.0));
    }
}
