//! Abstract object operations
//!
//! Stateless algorithms over the realm's object-capability interface and
//! the descriptor model: existence checks, descriptor reconciliation,
//! integrity levels, prototype-chain assignment, species lookup and the
//! array-like helpers the rest of the engine builds on.

use tracing::{debug, trace};

use crate::error::{VmError, VmResult};
use crate::object::ObjectRecord;
use crate::property::{
    DescriptorKind, PropertyDescriptor, PropertyKey, PropertySlot, Reconciliation, classify,
    reconcile,
};
use crate::realm::Realm;
use crate::value::{ObjectRef, Value, to_length};

/// Integrity level, `Sealed` is the weaker one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityLevel {
    /// No additions, no removals, no reconfiguration
    Sealed,
    /// Sealed, and data properties are read-only
    Frozen,
}

/// HasOwnProperty. Non-symbol keys go through the string-or-index
/// coercion, so `"1"` and `1` name the same property.
pub fn has_own_property(realm: &Realm, obj: ObjectRef, key: &PropertyKey) -> bool {
    realm.has_own(obj, &key.canonical())
}

/// Own property as a complete descriptor
pub fn get_own_property(realm: &Realm, obj: ObjectRef, key: &PropertyKey) -> Option<PropertyDescriptor> {
    realm
        .object(obj)
        .get_own(&key.canonical())
        .map(PropertySlot::to_descriptor)
}

/// TestIntegrityLevel
pub fn test_integrity_level(realm: &Realm, obj: ObjectRef, level: IntegrityLevel) -> bool {
    if realm.is_extensible(obj) {
        return false;
    }
    let record = realm.object(obj);
    for key in realm.own_keys(obj, true, true) {
        // Host-managed properties have no attributes to inspect
        let Some(slot) = record.get_own(&key) else {
            return false;
        };
        if slot.configurable() {
            return false;
        }
        if level == IntegrityLevel::Frozen && slot.writable() {
            return false;
        }
    }
    true
}

/// SetIntegrityLevel
///
/// Revokes extensibility, then clears `configurable` on every own property
/// (and `writable` on data properties when freezing).
pub fn set_integrity_level(realm: &mut Realm, obj: ObjectRef, level: IntegrityLevel) -> bool {
    if !realm.prevent_extensions(obj) {
        return false;
    }
    for key in realm.own_keys(obj, true, true) {
        let record = realm.object_mut(obj);
        let Some(current) = record.get_own(&key).cloned() else {
            return false;
        };
        let mut desc = PropertyDescriptor::default().with_configurable(false);
        if level == IntegrityLevel::Frozen && current.is_data() {
            desc = desc.with_writable(false);
        }
        if !validate_and_apply_property_descriptor(Some(record), &key, false, &desc, Some(&current)) {
            return false;
        }
    }
    debug!(target: "ferrite::object", object = obj.index(), ?level, "integrity level set");
    true
}

/// ValidateAndApplyPropertyDescriptor
///
/// With `object == None` this only answers whether the update would be
/// allowed. `current` must be the slot `object` currently holds for `key`.
pub fn validate_and_apply_property_descriptor(
    object: Option<&mut ObjectRecord>,
    key: &PropertyKey,
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&PropertySlot>,
) -> bool {
    match reconcile(extensible, desc, current) {
        Reconciliation::Reject => {
            trace!(target: "ferrite::object", %key, "descriptor rejected");
            false
        }
        Reconciliation::Keep => true,
        Reconciliation::Replace(slot) => {
            if let Some(record) = object {
                record.insert_slot(key.clone(), slot);
            }
            true
        }
    }
}

/// IsCompatiblePropertyDescriptor
pub fn is_compatible_property_descriptor(
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&PropertySlot>,
) -> bool {
    validate_and_apply_property_descriptor(None, &PropertyKey::string(""), extensible, desc, current)
}

/// OrdinaryDefineOwnProperty. Host objects accept plain value writes only.
pub fn define_own_property(
    realm: &mut Realm,
    obj: ObjectRef,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> VmResult<bool> {
    if desc.is_mixed() {
        return Err(VmError::type_error(
            "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
        ));
    }
    let key = key.canonical();
    let record = realm.object_mut(obj);
    if let Some(host) = record.kind_mut().as_foreign_mut() {
        return Ok(match (&desc.value, classify(desc)) {
            (Some(value), DescriptorKind::Data) => host.put(&key, value.clone()),
            _ => false,
        });
    }
    let extensible = record.is_extensible();
    let current = record.get_own(&key).cloned();
    Ok(validate_and_apply_property_descriptor(
        Some(record),
        &key,
        extensible,
        desc,
        current.as_ref(),
    ))
}

/// DefinePropertyOrThrow
pub fn define_property_or_throw(
    realm: &mut Realm,
    obj: ObjectRef,
    key: &PropertyKey,
    desc: &PropertyDescriptor,
) -> VmResult<()> {
    if define_own_property(realm, obj, key, desc)? {
        Ok(())
    } else {
        Err(VmError::type_error(format!("Cannot redefine property: {key}")))
    }
}

/// CreateDataProperty
pub fn create_data_property(
    realm: &mut Realm,
    obj: ObjectRef,
    key: &PropertyKey,
    value: Value,
) -> VmResult<bool> {
    define_own_property(
        realm,
        obj,
        key,
        &PropertyDescriptor::data(value, true, true, true),
    )
}

/// CreateDataPropertyOrThrow
pub fn create_data_property_or_throw(
    realm: &mut Realm,
    obj: ObjectRef,
    key: &PropertyKey,
    value: Value,
) -> VmResult<()> {
    if create_data_property(realm, obj, key, value)? {
        Ok(())
    } else {
        Err(VmError::type_error(format!("Cannot define property {key}")))
    }
}

/// DeletePropertyOrThrow
pub fn delete_property_or_throw(realm: &mut Realm, obj: ObjectRef, key: &PropertyKey) -> VmResult<()> {
    if realm.delete(obj, &key.canonical())? {
        Ok(())
    } else {
        Err(VmError::type_error(format!("Cannot delete property '{key}' of object")))
    }
}

/// GetMethod: `None` for undefined/null, TypeError if not callable.
/// Primitives other than undefined/null have no methods here.
pub fn get_method(realm: &mut Realm, value: &Value, key: &PropertyKey) -> VmResult<Option<Value>> {
    let obj = match value {
        Value::Object(obj) => *obj,
        Value::Undefined | Value::Null => {
            return Err(VmError::type_error(format!(
                "Cannot read properties of {} (reading '{key}')",
                value.display_string()
            )));
        }
        _ => return Ok(None),
    };
    let method = realm.get(obj, key.clone())?;
    if method.is_nullish() {
        return Ok(None);
    }
    if !realm.is_callable(&method) {
        return Err(VmError::type_error(format!("{key} is not a function")));
    }
    Ok(Some(method))
}

/// IsCallable
pub fn is_callable(realm: &Realm, value: &Value) -> bool {
    realm.is_callable(value)
}

/// IsConstructor
pub fn is_constructor(realm: &Realm, value: &Value) -> bool {
    realm.is_constructor(value)
}

/// SpeciesConstructor
pub fn species_constructor(realm: &mut Realm, obj: ObjectRef, default_constructor: &Value) -> VmResult<Value> {
    let constructor = match realm.get_property(obj, &PropertyKey::string("constructor"))? {
        None | Some(Value::Undefined) => return Ok(default_constructor.clone()),
        Some(c) => c,
    };
    let Some(constructor) = constructor.as_object() else {
        return Err(VmError::type_error(format!(
            "Expected argument of type object, but instead had type {}",
            realm.type_of(&constructor)
        )));
    };
    let species_key = PropertyKey::Symbol(realm.symbols().species.clone());
    let species = realm.get_property(constructor, &species_key)?.unwrap_or_default();
    if species.is_nullish() {
        return Ok(default_constructor.clone());
    }
    if realm.is_constructor(&species) {
        Ok(species)
    } else {
        Err(VmError::type_error(format!(
            "{} is not a constructor",
            realm.type_of(&species)
        )))
    }
}

enum OwnWrite {
    Written,
    /// The owner is a prototype: create the property on the receiver
    Shadow,
    Rejected(&'static str),
}

/// Set(O, P, V, Throw)
///
/// Finds the object on the prototype chain that owns `key` (the base,
/// defaulting to `obj`). Setters run and read-only checks apply there;
/// an inherited writable data property is shadowed by a new own property
/// on `obj`. Host objects take the write unchanged. A refused write raises
/// TypeError if `fail_on_error` or the realm is strict, else returns false.
pub fn put_property(
    realm: &mut Realm,
    obj: ObjectRef,
    key: &PropertyKey,
    value: Value,
    fail_on_error: bool,
) -> VmResult<bool> {
    let key = key.canonical();
    let base = find_owner(realm, obj, &key).unwrap_or(obj);

    if let Some(host) = realm.object_mut(base).kind_mut().as_foreign_mut() {
        if host.put(&key, value) {
            return Ok(true);
        }
        return reject_write(realm, &key, "host-managed", fail_on_error);
    }

    match put_own_property(realm, base, obj, &key, value.clone())? {
        OwnWrite::Written => Ok(true),
        OwnWrite::Rejected(reason) => reject_write(realm, &key, reason, fail_on_error),
        OwnWrite::Shadow => {
            if realm.put(obj, key.clone(), value)? {
                Ok(true)
            } else {
                reject_write(realm, &key, "non-extensible object's", fail_on_error)
            }
        }
    }
}

fn find_owner(realm: &Realm, obj: ObjectRef, key: &PropertyKey) -> Option<ObjectRef> {
    let mut current = Some(obj);
    while let Some(o) = current {
        if realm.has_own(o, key) {
            return Some(o);
        }
        current = realm.prototype(o);
    }
    None
}

fn put_own_property(
    realm: &mut Realm,
    base: ObjectRef,
    receiver: ObjectRef,
    key: &PropertyKey,
    value: Value,
) -> VmResult<OwnWrite> {
    let record = realm.object_mut(base);
    let extensible = record.is_extensible();
    match record.get_own_mut(key) {
        None => {
            if !extensible {
                return Ok(OwnWrite::Rejected("non-extensible object's"));
            }
            record.insert_slot(key.clone(), PropertySlot::data(value));
            Ok(OwnWrite::Written)
        }
        Some(PropertySlot::Data { writable: false, .. }) => Ok(OwnWrite::Rejected("read-only")),
        Some(PropertySlot::Data { value: stored, .. }) => {
            if base != receiver {
                return Ok(OwnWrite::Shadow);
            }
            *stored = value;
            Ok(OwnWrite::Written)
        }
        Some(PropertySlot::Accessor { set, .. }) => {
            let setter = set.clone();
            if setter.is_undefined() {
                return Ok(OwnWrite::Rejected("getter-only"));
            }
            realm.call(&setter, &Value::Object(receiver), &[value])?;
            Ok(OwnWrite::Written)
        }
    }
}

fn reject_write(realm: &Realm, key: &PropertyKey, reason: &str, fail_on_error: bool) -> VmResult<bool> {
    trace!(target: "ferrite::object", %key, reason, "write refused");
    if fail_on_error || realm.config().strict {
        Err(VmError::type_error(format!(
            "Cannot assign to {reason} property '{key}'"
        )))
    } else {
        Ok(false)
    }
}

/// LengthOfArrayLike
pub fn length_of_array_like(realm: &mut Realm, obj: ObjectRef) -> VmResult<u64> {
    Ok(to_length(realm.get(obj, "length")?.to_number()?))
}

/// CreateListFromArrayLike. Every element must satisfy `allowed`; lengths
/// beyond the realm's iteration bound raise RangeError.
pub fn create_list_from_array_like(
    realm: &mut Realm,
    value: &Value,
    allowed: impl Fn(&Value) -> bool,
) -> VmResult<Vec<Value>> {
    let Some(obj) = value.as_object() else {
        return Err(VmError::type_error(
            "CreateListFromArrayLike called on non-object",
        ));
    };
    let length = length_of_array_like(realm, obj)?;
    if length > realm.config().max_iterations {
        return Err(VmError::range_error(format!("Invalid array length: {length}")));
    }
    let mut list = Vec::new();
    for index in 0..length {
        let key = match u32::try_from(index) {
            Ok(i) if i < u32::MAX => PropertyKey::Index(i),
            _ => PropertyKey::string(&index.to_string()),
        };
        let element = realm.get(obj, key)?;
        if !allowed(&element) {
            return Err(VmError::type_error(format!(
                "{} is not a valid list element",
                realm.type_of(&element)
            )));
        }
        list.push(element);
    }
    Ok(list)
}

impl PropertyDescriptor {
    /// ToPropertyDescriptor: read the fields a script object carries
    pub fn from_object(realm: &mut Realm, value: &Value) -> VmResult<Self> {
        let Some(obj) = value.as_object() else {
            return Err(VmError::type_error(format!(
                "Property description must be an object: {}",
                value.display_string()
            )));
        };
        let mut desc = Self::default();
        let field = |realm: &mut Realm, name: &str| -> VmResult<Option<Value>> {
            let key = PropertyKey::string(name);
            if realm.has(obj, &key) {
                realm.get(obj, key).map(Some)
            } else {
                Ok(None)
            }
        };

        desc.enumerable = field(realm, "enumerable")?.map(|v| v.to_boolean());
        desc.configurable = field(realm, "configurable")?.map(|v| v.to_boolean());
        desc.value = field(realm, "value")?;
        desc.writable = field(realm, "writable")?.map(|v| v.to_boolean());
        for (name, slot) in [("get", &mut desc.get), ("set", &mut desc.set)] {
            if let Some(accessor) = field(realm, name)? {
                if !accessor.is_undefined() && !realm.is_callable(&accessor) {
                    let kind = if name == "get" { "Getter" } else { "Setter" };
                    return Err(VmError::type_error(format!(
                        "{kind} must be a function: {}",
                        accessor.display_string()
                    )));
                }
                *slot = Some(accessor);
            }
        }
        if desc.is_mixed() {
            return Err(VmError::type_error(
                "Invalid property descriptor. Cannot both specify accessors and a value or writable attribute",
            ));
        }
        Ok(desc)
    }
}

/// FromPropertyDescriptor: `undefined` for `None`, otherwise an ordinary
/// object with one enumerable property per present field
pub fn from_property_descriptor(realm: &mut Realm, desc: Option<&PropertyDescriptor>) -> Value {
    let Some(desc) = desc else {
        return Value::Undefined;
    };
    let obj = realm.create_object();
    let record = realm.object_mut(obj);
    let fields = [
        ("value", desc.value.clone()),
        ("writable", desc.writable.map(Value::Boolean)),
        ("get", desc.get.clone()),
        ("set", desc.set.clone()),
        ("enumerable", desc.enumerable.map(Value::Boolean)),
        ("configurable", desc.configurable.map(Value::Boolean)),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            record.insert_slot(PropertyKey::string(name), PropertySlot::data(value));
        }
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RealmConfig;

    fn object_with_x(realm: &mut Realm) -> ObjectRef {
        let obj = realm.create_object();
        realm.put(obj, "x", Value::number(1.0)).unwrap();
        obj
    }

    #[test]
    fn test_has_own_property_coerces_index_strings() {
        let mut realm = Realm::default();
        let obj = realm.create_object();
        realm.put(obj, 1u32, Value::Null).unwrap();
        assert!(has_own_property(&realm, obj, &PropertyKey::string("1")));
        assert!(has_own_property(
            &realm,
            obj,
            &PropertyKey::String(std::sync::Arc::from("1"))
        ));
        let child = realm.create_object_with_proto(Some(obj));
        assert!(!has_own_property(&realm, child, &PropertyKey::index(1)));
    }

    #[test]
    fn test_extensible_object_is_never_sealed() {
        let mut realm = Realm::default();
        let obj = realm.create_object();
        assert!(!test_integrity_level(&realm, obj, IntegrityLevel::Sealed));
        realm.prevent_extensions(obj);
        assert!(test_integrity_level(&realm, obj, IntegrityLevel::Frozen));
    }

    #[test]
    fn test_seal_keeps_writability() {
        let mut realm = Realm::default();
        let obj = object_with_x(&mut realm);
        assert!(set_integrity_level(&mut realm, obj, IntegrityLevel::Sealed));
        assert!(test_integrity_level(&realm, obj, IntegrityLevel::Sealed));
        assert!(!test_integrity_level(&realm, obj, IntegrityLevel::Frozen));
        let desc = get_own_property(&realm, obj, &PropertyKey::string("x")).unwrap();
        assert_eq!(desc, PropertyDescriptor::data(Value::number(1.0), true, true, false));
    }

    #[test]
    fn test_freeze_leaves_accessors_alone() {
        let mut realm = Realm::default();
        let obj = realm.create_object();
        let getter = realm.create_native_function("get", 0, |_, _, _| Ok(Value::number(5.0)));
        define_property_or_throw(
            &mut realm,
            obj,
            &PropertyKey::string("g"),
            &PropertyDescriptor::accessor(Value::Object(getter), Value::Undefined, true, true),
        )
        .unwrap();
        assert!(set_integrity_level(&mut realm, obj, IntegrityLevel::Frozen));
        let desc = get_own_property(&realm, obj, &PropertyKey::string("g")).unwrap();
        assert_eq!(desc.configurable, Some(false));
        assert_eq!(desc.writable, None);
        assert_eq!(realm.get(obj, "g").unwrap(), Value::number(5.0));
    }

    #[test]
    fn test_define_own_property_rejects_mixed() {
        let mut realm = Realm::default();
        let obj = realm.create_object();
        let desc = PropertyDescriptor::value(Value::Null).with_get(Value::Undefined);
        let err = define_own_property(&mut realm, obj, &PropertyKey::string("m"), &desc).unwrap_err();
        assert!(matches!(err, VmError::TypeError(_)));
    }

    #[test]
    fn test_define_property_or_throw_on_frozen() {
        let mut realm = Realm::default();
        let obj = object_with_x(&mut realm);
        set_integrity_level(&mut realm, obj, IntegrityLevel::Frozen);
        let err = define_property_or_throw(
            &mut realm,
            obj,
            &PropertyKey::string("x"),
            &PropertyDescriptor::value(Value::number(2.0)),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "TypeError: Cannot redefine property: x");
        assert!(create_data_property_or_throw(&mut realm, obj, &PropertyKey::string("y"), Value::Null).is_err());
    }

    #[test]
    fn test_put_property_shadows_inherited_data() {
        let mut realm = Realm::default();
        let proto = object_with_x(&mut realm);
        let obj = realm.create_object_with_proto(Some(proto));
        assert!(put_property(&mut realm, obj, &PropertyKey::string("x"), Value::number(2.0), true).unwrap());
        assert_eq!(realm.get(proto, "x").unwrap(), Value::number(1.0));
        assert_eq!(realm.get(obj, "x").unwrap(), Value::number(2.0));
    }

    #[test]
    fn test_put_property_inherited_read_only() {
        let mut realm = Realm::default();
        let proto = object_with_x(&mut realm);
        set_integrity_level(&mut realm, proto, IntegrityLevel::Frozen);
        let obj = realm.create_object_with_proto(Some(proto));
        assert!(!put_property(&mut realm, obj, &PropertyKey::string("x"), Value::number(2.0), false).unwrap());
        assert!(!realm.has_own(obj, &PropertyKey::string("x")));
        assert!(put_property(&mut realm, obj, &PropertyKey::string("x"), Value::number(2.0), true).is_err());
    }

    #[test]
    fn test_put_property_runs_inherited_setter_on_receiver() {
        let mut realm = Realm::default();
        let proto = realm.create_object();
        let setter = realm.create_native_function("set", 1, |realm, this, args| {
            let obj = this.as_object().ok_or_else(|| VmError::type_error("bad this"))?;
            realm.put(obj, "seen", args.first().cloned().unwrap_or_default())?;
            Ok(Value::Undefined)
        });
        define_property_or_throw(
            &mut realm,
            proto,
            &PropertyKey::string("v"),
            &PropertyDescriptor::default().with_set(Value::Object(setter)),
        )
        .unwrap();
        let obj = realm.create_object_with_proto(Some(proto));
        put_property(&mut realm, obj, &PropertyKey::string("v"), Value::number(9.0), true).unwrap();
        assert_eq!(realm.get(obj, "seen").unwrap(), Value::number(9.0));
        assert!(!realm.has_own(proto, &PropertyKey::string("seen")));
    }

    #[test]
    fn test_getter_only_accessor_strictness() {
        let mut realm = Realm::new(RealmConfig::new().strict(true));
        let obj = realm.create_object();
        let getter = realm.create_native_function("get", 0, |_, _, _| Ok(Value::Null));
        define_property_or_throw(
            &mut realm,
            obj,
            &PropertyKey::string("g"),
            &PropertyDescriptor::default().with_get(Value::Object(getter)),
        )
        .unwrap();
        let err = put_property(&mut realm, obj, &PropertyKey::string("g"), Value::Null, false).unwrap_err();
        assert!(err.to_string().contains("getter-only"));
    }

    #[test]
    fn test_species_constructor() {
        let mut realm = Realm::default();
        let default_ctor = realm.create_native_constructor("Default", 0, |_, _, _| Ok(Value::Undefined));
        let default_ctor = Value::Object(default_ctor);

        let plain = realm.create_object();
        assert_eq!(species_constructor(&mut realm, plain, &default_ctor).unwrap(), default_ctor);

        realm.put(plain, "constructor", Value::number(1.0)).unwrap();
        assert!(species_constructor(&mut realm, plain, &default_ctor).is_err());

        let ctor = realm.create_object();
        realm.put(plain, "constructor", Value::Object(ctor)).unwrap();
        assert_eq!(species_constructor(&mut realm, plain, &default_ctor).unwrap(), default_ctor);

        let species = realm.symbols().species.clone();
        realm.put(ctor, species.clone(), Value::Null).unwrap();
        assert_eq!(species_constructor(&mut realm, plain, &default_ctor).unwrap(), default_ctor);

        let not_ctor = realm.create_native_function("f", 0, |_, _, _| Ok(Value::Undefined));
        realm.put(ctor, species.clone(), Value::Object(not_ctor)).unwrap();
        let err = species_constructor(&mut realm, plain, &default_ctor).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: function is not a constructor");

        let derived = realm.create_native_constructor("Derived", 0, |_, _, _| Ok(Value::Undefined));
        realm.put(ctor, species, Value::Object(derived)).unwrap();
        assert_eq!(
            species_constructor(&mut realm, plain, &default_ctor).unwrap(),
            Value::Object(derived)
        );
    }

    #[test]
    fn test_get_method() {
        let mut realm = Realm::default();
        let obj = realm.create_object();
        realm.put(obj, "n", Value::number(1.0)).unwrap();
        assert_eq!(get_method(&mut realm, &Value::Object(obj), &PropertyKey::string("absent")).unwrap(), None);
        assert!(get_method(&mut realm, &Value::Object(obj), &PropertyKey::string("n")).is_err());
        assert!(get_method(&mut realm, &Value::Undefined, &PropertyKey::string("n")).is_err());
    }

    #[test]
    fn test_create_list_from_array_like() {
        let mut realm = Realm::default();
        let array = realm.create_array_from_list([Value::number(1.0), Value::string("a")]);
        let list = create_list_from_array_like(&mut realm, &Value::Object(array), |_| true).unwrap();
        assert_eq!(list, vec![Value::number(1.0), Value::string("a")]);

        let err = create_list_from_array_like(&mut realm, &Value::Object(array), |v| v.as_number().is_some())
            .unwrap_err();
        assert!(matches!(err, VmError::TypeError(_)));

        let mut bounded = Realm::new(RealmConfig::new().max_iterations(1));
        let array = bounded.create_array_from_list([Value::Null, Value::Null]);
        let err = create_list_from_array_like(&mut bounded, &Value::Object(array), |_| true).unwrap_err();
        assert!(matches!(err, VmError::RangeError(_)));
    }

    #[test]
    fn test_descriptor_object_conversion() {
        let mut realm = Realm::default();
        let desc = PropertyDescriptor::data(Value::number(3.0), false, true, false);
        let obj = from_property_descriptor(&mut realm, Some(&desc));
        let back = PropertyDescriptor::from_object(&mut realm, &obj).unwrap();
        assert_eq!(back, desc);
        assert_eq!(from_property_descriptor(&mut realm, None), Value::Undefined);

        let bad = realm.create_object();
        realm.put(bad, "get", Value::number(1.0)).unwrap();
        assert!(PropertyDescriptor::from_object(&mut realm, &Value::Object(bad)).is_err());

        let mixed = realm.create_object();
        realm.put(mixed, "value", Value::Null).unwrap();
        realm.put(mixed, "set", Value::Undefined).unwrap();
        assert!(PropertyDescriptor::from_object(&mut realm, &Value::Object(mixed)).is_err());
        assert!(PropertyDescriptor::from_object(&mut realm, &Value::Null).is_err());
    }
}
