//! Integrity Level Tests
//!
//! Seal/freeze behavior as seen through the object-capability interface.

use ferrite_vm_core::operations::{
    define_own_property, put_property, set_integrity_level, test_integrity_level,
};
use ferrite_vm_core::{
    IntegrityLevel, ObjectRef, PropertyDescriptor, PropertyKey, Realm, RealmConfig, Value, VmError,
};
use proptest::prelude::*;

fn object_with_x(realm: &mut Realm) -> ObjectRef {
    let obj = realm.create_object();
    realm.put(obj, "x", Value::number(1.0)).unwrap();
    obj
}

#[test]
fn test_sealed_object_scenario() {
    let mut realm = Realm::default();
    let obj = object_with_x(&mut realm);
    assert!(set_integrity_level(&mut realm, obj, IntegrityLevel::Sealed));

    let x = PropertyKey::string("x");
    assert!(!realm.delete(obj, &x).unwrap());
    assert!(realm.has_own(obj, &x));

    assert!(put_property(&mut realm, obj, &x, Value::number(2.0), false).unwrap());
    assert_eq!(realm.get(obj, "x").unwrap(), Value::number(2.0));

    let y = PropertyKey::string("y");
    assert!(!put_property(&mut realm, obj, &y, Value::number(3.0), false).unwrap());
    assert!(!realm.has_own(obj, &y));
}

#[test]
fn test_frozen_object_silent_failure() {
    let mut realm = Realm::default();
    let obj = object_with_x(&mut realm);
    assert!(set_integrity_level(&mut realm, obj, IntegrityLevel::Frozen));

    let x = PropertyKey::string("x");
    assert!(!put_property(&mut realm, obj, &x, Value::number(2.0), false).unwrap());
    assert_eq!(realm.get(obj, "x").unwrap(), Value::number(1.0));
}

#[test]
fn test_frozen_object_strict_failure() {
    let mut realm = Realm::new(RealmConfig::new().strict(true));
    let obj = object_with_x(&mut realm);
    assert!(set_integrity_level(&mut realm, obj, IntegrityLevel::Frozen));

    let x = PropertyKey::string("x");
    let err = put_property(&mut realm, obj, &x, Value::number(2.0), false).unwrap_err();
    assert!(matches!(err, VmError::TypeError(_)));
    assert_eq!(realm.get(obj, "x").unwrap(), Value::number(1.0));

    // Strict deletes raise as well
    assert!(realm.delete(obj, &x).is_err());
}

#[test]
fn test_freeze_covers_hidden_and_symbol_keys() {
    let mut realm = Realm::default();
    let obj = realm.create_object();
    let sym = realm.new_symbol(Some("tag"));
    realm.define_builtin(obj, "hidden", Value::Null);
    realm.put(obj, sym.clone(), Value::Null).unwrap();
    assert!(set_integrity_level(&mut realm, obj, IntegrityLevel::Frozen));

    for key in [PropertyKey::string("hidden"), PropertyKey::Symbol(sym)] {
        let slot = realm.object(obj).get_own(&key).unwrap();
        assert!(!slot.configurable());
        assert!(!slot.writable());
    }
}

#[test]
fn test_frozen_prototype_blocks_inherited_assignment() {
    let mut realm = Realm::default();
    let proto = object_with_x(&mut realm);
    set_integrity_level(&mut realm, proto, IntegrityLevel::Frozen);
    let child = realm.create_object_with_proto(Some(proto));

    let x = PropertyKey::string("x");
    assert!(!put_property(&mut realm, child, &x, Value::number(5.0), false).unwrap());
    assert!(put_property(&mut realm, child, &x, Value::number(5.0), true).is_err());

    // Defining an own property directly still works
    let defined = define_own_property(
        &mut realm,
        child,
        &x,
        &PropertyDescriptor::data(Value::number(5.0), true, true, true),
    )
    .unwrap();
    assert!(defined);
    assert_eq!(realm.get(child, "x").unwrap(), Value::number(5.0));
}

#[test]
fn test_non_extensible_empty_object_is_frozen() {
    let mut realm = Realm::default();
    let obj = realm.create_object();
    realm.prevent_extensions(obj);
    assert!(test_integrity_level(&realm, obj, IntegrityLevel::Sealed));
    assert!(test_integrity_level(&realm, obj, IntegrityLevel::Frozen));
}

#[derive(Debug, Clone)]
enum Shape {
    Data { writable: bool, configurable: bool },
    Accessor { configurable: bool },
}

fn shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        (any::<bool>(), any::<bool>()).prop_map(|(writable, configurable)| Shape::Data {
            writable,
            configurable
        }),
        any::<bool>().prop_map(|configurable| Shape::Accessor { configurable }),
    ]
}

fn build(realm: &mut Realm, shapes: &[Shape], extensible: bool) -> ObjectRef {
    let obj = realm.create_object();
    for (i, shape) in shapes.iter().enumerate() {
        let key = PropertyKey::string(&format!("p{i}"));
        let desc = match shape {
            Shape::Data {
                writable,
                configurable,
            } => PropertyDescriptor::data(Value::number(i as f64), *writable, true, *configurable),
            Shape::Accessor { configurable } => {
                PropertyDescriptor::accessor(Value::Undefined, Value::Undefined, false, *configurable)
            }
        };
        assert!(define_own_property(realm, obj, &key, &desc).unwrap());
    }
    if !extensible {
        realm.prevent_extensions(obj);
    }
    obj
}

proptest! {
    #[test]
    fn freeze_then_test_holds(shapes in prop::collection::vec(shape(), 0..8)) {
        let mut realm = Realm::default();
        let obj = build(&mut realm, &shapes, true);
        prop_assert!(set_integrity_level(&mut realm, obj, IntegrityLevel::Frozen));
        prop_assert!(test_integrity_level(&realm, obj, IntegrityLevel::Frozen));

        for i in 0..=shapes.len() {
            let key = PropertyKey::string(&format!("p{i}"));
            let written = put_property(&mut realm, obj, &key, Value::string("new"), false).unwrap();
            prop_assert!(!written);
        }
    }

    #[test]
    fn frozen_implies_sealed(shapes in prop::collection::vec(shape(), 0..8), extensible in any::<bool>()) {
        let mut realm = Realm::default();
        let obj = build(&mut realm, &shapes, extensible);
        if test_integrity_level(&realm, obj, IntegrityLevel::Frozen) {
            prop_assert!(test_integrity_level(&realm, obj, IntegrityLevel::Sealed));
        }
    }

    #[test]
    fn seal_keeps_values_and_writability(shapes in prop::collection::vec(shape(), 0..8)) {
        let mut realm = Realm::default();
        let obj = build(&mut realm, &shapes, true);
        let before: Vec<_> = realm
            .own_keys(obj, true, true)
            .iter()
            .map(|key| realm.object(obj).get_own(key).map(|slot| (slot.writable(), slot.value().cloned())))
            .collect();
        prop_assert!(set_integrity_level(&mut realm, obj, IntegrityLevel::Sealed));
        let after: Vec<_> = realm
            .own_keys(obj, true, true)
            .iter()
            .map(|key| realm.object(obj).get_own(key).map(|slot| (slot.writable(), slot.value().cloned())))
            .collect();
        prop_assert_eq!(before, after);
        prop_assert!(test_integrity_level(&realm, obj, IntegrityLevel::Sealed));
    }
}
