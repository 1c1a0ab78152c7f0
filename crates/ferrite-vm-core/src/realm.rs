//! Realm: the object arena plus the object-capability interface
//!
//! Every object operation goes through a `Realm`, which owns the heap, the
//! well-known symbols, the intrinsic prototypes and the configuration.
//! Abstract operations (`crate::operations`) are written purely against
//! the methods here.

use std::sync::Arc;

use tracing::trace;

use crate::config::RealmConfig;
use crate::error::{VmError, VmResult};
use crate::heap::Heap;
use crate::object::{ForeignObject, FunctionData, ObjectKind, ObjectRecord};
use crate::property::{PropertyKey, PropertySlot};
use crate::value::{ObjectRef, Symbol, Value};

/// Symbols every realm registers
#[derive(Debug, Clone)]
pub struct WellKnownSymbols {
    /// `Symbol.iterator`
    pub iterator: Symbol,
    /// `Symbol.species`
    pub species: Symbol,
    /// `Symbol.toStringTag`
    pub to_string_tag: Symbol,
}

/// Intrinsic prototypes
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    /// `%Object.prototype%`
    pub object_prototype: ObjectRef,
    /// `%Function.prototype%`
    pub function_prototype: ObjectRef,
    /// `%IteratorPrototype%`
    pub iterator_prototype: ObjectRef,
    /// `%GeneratorPrototype%`
    pub generator_prototype: ObjectRef,
    /// `%ListIteratorPrototype%`
    pub list_iterator_prototype: ObjectRef,
    /// `%Array.prototype%`
    pub array_prototype: ObjectRef,
}

/// An isolated object graph with its intrinsics
#[derive(Debug)]
pub struct Realm {
    heap: Heap,
    config: RealmConfig,
    symbols: WellKnownSymbols,
    intrinsics: Intrinsics,
    next_symbol_id: u32,
}

impl Default for Realm {
    fn default() -> Self {
        Self::new(RealmConfig::default())
    }
}

impl Realm {
    /// Create a realm and install its intrinsics
    pub fn new(config: RealmConfig) -> Self {
        let mut heap = Heap::new();
        let ordinary = |proto| ObjectRecord::new(ObjectKind::Ordinary, proto);

        let object_prototype = heap.alloc(ordinary(None));
        let function_prototype = heap.alloc(ordinary(Some(object_prototype)));
        let iterator_prototype = heap.alloc(ordinary(Some(object_prototype)));
        let generator_prototype = heap.alloc(ordinary(Some(iterator_prototype)));
        let list_iterator_prototype = heap.alloc(ordinary(Some(iterator_prototype)));
        let array_prototype = heap.alloc(ordinary(Some(object_prototype)));

        let symbols = WellKnownSymbols {
            iterator: Symbol::new(0, Some(Arc::from("Symbol.iterator"))),
            species: Symbol::new(1, Some(Arc::from("Symbol.species"))),
            to_string_tag: Symbol::new(2, Some(Arc::from("Symbol.toStringTag"))),
        };

        let mut realm = Self {
            heap,
            config,
            symbols,
            intrinsics: Intrinsics {
                object_prototype,
                function_prototype,
                iterator_prototype,
                generator_prototype,
                list_iterator_prototype,
                array_prototype,
            },
            next_symbol_id: 3,
        };
        crate::iteration::install_intrinsics(&mut realm);
        crate::generator::install_intrinsics(&mut realm);
        realm
    }

    /// Active configuration
    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    /// Well-known symbols
    pub fn symbols(&self) -> &WellKnownSymbols {
        &self.symbols
    }

    /// Intrinsic prototypes
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// The arena
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Borrow an object record
    pub fn object(&self, obj: ObjectRef) -> &ObjectRecord {
        self.heap.get(obj)
    }

    /// Mutably borrow an object record
    pub fn object_mut(&mut self, obj: ObjectRef) -> &mut ObjectRecord {
        self.heap.get_mut(obj)
    }

    /// Create a fresh symbol
    pub fn new_symbol(&mut self, description: Option<&str>) -> Symbol {
        let id = self.next_symbol_id;
        self.next_symbol_id += 1;
        Symbol::new(id, description.map(Arc::from))
    }

    // ---------------------------------------------------------------
    // Allocation
    // ---------------------------------------------------------------

    /// Allocate an object of the given kind
    pub fn alloc(&mut self, kind: ObjectKind, prototype: Option<ObjectRef>) -> ObjectRef {
        self.heap.alloc(ObjectRecord::new(kind, prototype))
    }

    /// Ordinary object inheriting from `%Object.prototype%`
    pub fn create_object(&mut self) -> ObjectRef {
        let proto = self.intrinsics.object_prototype;
        self.alloc(ObjectKind::Ordinary, Some(proto))
    }

    /// Ordinary object with an explicit prototype
    pub fn create_object_with_proto(&mut self, prototype: Option<ObjectRef>) -> ObjectRef {
        self.alloc(ObjectKind::Ordinary, prototype)
    }

    /// Wrap a host object
    pub fn create_foreign(&mut self, host: impl ForeignObject + 'static) -> ObjectRef {
        let proto = self.intrinsics.object_prototype;
        self.alloc(ObjectKind::Foreign(Box::new(host)), Some(proto))
    }

    /// Insert a writable, non-enumerable, configurable data property
    pub fn define_builtin(&mut self, obj: ObjectRef, key: impl Into<PropertyKey>, value: Value) {
        self.heap
            .get_mut(obj)
            .insert_slot(key.into(), PropertySlot::hidden(value));
    }

    /// Install a native method as a builtin property
    pub fn define_method<F>(
        &mut self,
        obj: ObjectRef,
        key: impl Into<PropertyKey>,
        name: &str,
        length: u32,
        f: F,
    ) -> ObjectRef
    where
        F: Fn(&mut Realm, &Value, &[Value]) -> VmResult<Value> + 'static,
    {
        let func = self.create_native_function(name, length, f);
        self.define_builtin(obj, key, Value::Object(func));
        func
    }

    // ---------------------------------------------------------------
    // Object-capability interface
    // ---------------------------------------------------------------

    /// Property lookup along the prototype chain. `None` when no object
    /// on the chain has the key. Getters run with `obj` as receiver.
    pub fn get_property(&mut self, obj: ObjectRef, key: &PropertyKey) -> VmResult<Option<Value>> {
        self.get_with_receiver(obj, key, &Value::Object(obj))
    }

    /// Lookup with an explicit getter receiver
    pub fn get_with_receiver(
        &mut self,
        obj: ObjectRef,
        key: &PropertyKey,
        receiver: &Value,
    ) -> VmResult<Option<Value>> {
        let mut current = Some(obj);
        while let Some(o) = current {
            let record = self.heap.get(o);
            if let Some(host) = record.kind().as_foreign() {
                if host.has(key) {
                    return Ok(Some(host.get(key).unwrap_or_default()));
                }
            } else if let Some(slot) = record.get_own(key) {
                let getter = match slot {
                    PropertySlot::Data { value, .. } => return Ok(Some(value.clone())),
                    PropertySlot::Accessor { get, .. } => get.clone(),
                };
                if getter.is_undefined() {
                    return Ok(Some(Value::Undefined));
                }
                return self.call(&getter, receiver, &[]).map(Some);
            }
            current = record.prototype();
        }
        Ok(None)
    }

    /// Property value, `undefined` when absent
    pub fn get(&mut self, obj: ObjectRef, key: impl Into<PropertyKey>) -> VmResult<Value> {
        let key = key.into();
        Ok(self.get_property(obj, &key)?.unwrap_or_default())
    }

    /// Own-property write on `obj`: updates a writable data slot, runs a
    /// setter, or adds a new data property if `obj` is extensible. Returns
    /// false if the write was refused.
    pub fn put(&mut self, obj: ObjectRef, key: impl Into<PropertyKey>, value: Value) -> VmResult<bool> {
        let key = key.into();
        let record = self.heap.get_mut(obj);
        if let Some(host) = record.kind_mut().as_foreign_mut() {
            return Ok(host.put(&key, value));
        }
        let extensible = record.is_extensible();
        match record.get_own_mut(&key) {
            Some(PropertySlot::Data {
                value: stored,
                writable,
                ..
            }) => {
                if !*writable {
                    return Ok(false);
                }
                *stored = value;
                Ok(true)
            }
            Some(PropertySlot::Accessor { set, .. }) => {
                let setter = set.clone();
                if setter.is_undefined() {
                    return Ok(false);
                }
                self.call(&setter, &Value::Object(obj), &[value])?;
                Ok(true)
            }
            None => {
                if !extensible {
                    return Ok(false);
                }
                record.insert_slot(key, PropertySlot::data(value));
                Ok(true)
            }
        }
    }

    /// Property existence along the prototype chain
    pub fn has(&self, obj: ObjectRef, key: &PropertyKey) -> bool {
        let mut current = Some(obj);
        while let Some(o) = current {
            let record = self.heap.get(o);
            let found = match record.kind().as_foreign() {
                Some(host) => host.has(key),
                None => record.has_own(key),
            };
            if found {
                return true;
            }
            current = record.prototype();
        }
        false
    }

    /// Own-property existence, without prototype traversal
    pub fn has_own(&self, obj: ObjectRef, key: &PropertyKey) -> bool {
        let record = self.heap.get(obj);
        match record.kind().as_foreign() {
            Some(host) => host.has(key),
            None => record.has_own(key),
        }
    }

    /// Remove an own property. Absent keys succeed; non-configurable
    /// properties are kept and the call fails (a TypeError when strict).
    pub fn delete(&mut self, obj: ObjectRef, key: &PropertyKey) -> VmResult<bool> {
        let strict = self.config.strict;
        let record = self.heap.get_mut(obj);
        if let Some(host) = record.kind_mut().as_foreign_mut() {
            return Ok(host.delete(key));
        }
        let configurable = match record.get_own(key) {
            None => return Ok(true),
            Some(slot) => slot.configurable(),
        };
        if configurable {
            record.remove(key);
            Ok(true)
        } else if strict {
            Err(VmError::type_error(format!(
                "Cannot delete property '{key}' of object"
            )))
        } else {
            Ok(false)
        }
    }

    /// Own keys in enumeration order
    pub fn own_keys(
        &self,
        obj: ObjectRef,
        include_non_enumerable: bool,
        include_symbols: bool,
    ) -> Vec<PropertyKey> {
        let record = self.heap.get(obj);
        match record.kind().as_foreign() {
            Some(host) => host
                .own_keys()
                .into_iter()
                .filter(|key| include_symbols || !key.is_symbol())
                .collect(),
            None => record.ordered_keys_with(
                include_non_enumerable,
                include_symbols,
                self.config.enumerate_indices_first,
            ),
        }
    }

    /// Prototype handle
    pub fn prototype(&self, obj: ObjectRef) -> Option<ObjectRef> {
        self.heap.get(obj).prototype()
    }

    /// Change the prototype. Refused on non-extensible objects and when
    /// the new chain would loop back to `obj`.
    pub fn set_prototype(&mut self, obj: ObjectRef, prototype: Option<ObjectRef>) -> bool {
        if self.prototype(obj) == prototype {
            return true;
        }
        if !self.is_extensible(obj) {
            trace!(target: "ferrite::object", object = obj.index(), "prototype change on non-extensible object refused");
            return false;
        }
        let mut cursor = prototype;
        while let Some(p) = cursor {
            if p == obj {
                trace!(target: "ferrite::object", object = obj.index(), "prototype cycle refused");
                return false;
            }
            cursor = self.prototype(p);
        }
        self.heap.get_mut(obj).set_prototype_unchecked(prototype);
        true
    }

    /// Enclosing scope object
    pub fn parent_scope(&self, obj: ObjectRef) -> Option<ObjectRef> {
        self.heap.get(obj).parent_scope()
    }

    /// Set the enclosing scope object
    pub fn set_parent_scope(&mut self, obj: ObjectRef, scope: Option<ObjectRef>) {
        self.heap.get_mut(obj).set_parent_scope(scope);
    }

    /// Extensible flag
    pub fn is_extensible(&self, obj: ObjectRef) -> bool {
        self.heap.get(obj).is_extensible()
    }

    /// Revoke extensibility
    pub fn prevent_extensions(&mut self, obj: ObjectRef) -> bool {
        self.heap.get_mut(obj).set_extensible(false)
    }

    // ---------------------------------------------------------------
    // Callables
    // ---------------------------------------------------------------

    /// Create a plain (non-constructor) native function
    pub fn create_native_function<F>(&mut self, name: &str, length: u32, f: F) -> ObjectRef
    where
        F: Fn(&mut Realm, &Value, &[Value]) -> VmResult<Value> + 'static,
    {
        self.alloc_function(name, length, std::rc::Rc::new(f), false)
    }

    /// Create a native constructor with a fresh `prototype` object whose
    /// `constructor` points back at it
    pub fn create_native_constructor<F>(&mut self, name: &str, length: u32, f: F) -> ObjectRef
    where
        F: Fn(&mut Realm, &Value, &[Value]) -> VmResult<Value> + 'static,
    {
        let ctor = self.alloc_function(name, length, std::rc::Rc::new(f), true);
        let proto = self.create_object();
        self.define_builtin(proto, "constructor", Value::Object(ctor));
        self.heap.get_mut(ctor).insert_slot(
            PropertyKey::string("prototype"),
            PropertySlot::Data {
                value: Value::Object(proto),
                writable: true,
                enumerable: false,
                configurable: false,
            },
        );
        ctor
    }

    fn alloc_function(
        &mut self,
        name: &str,
        length: u32,
        native: crate::object::NativeFn,
        constructor: bool,
    ) -> ObjectRef {
        let proto = self.intrinsics.function_prototype;
        let func = self.alloc(
            ObjectKind::Function(FunctionData {
                name: Arc::from(name),
                length,
                native,
                constructor,
            }),
            Some(proto),
        );
        let record = self.heap.get_mut(func);
        for (key, value) in [
            ("length", Value::number(length as f64)),
            ("name", Value::string(name)),
        ] {
            record.insert_slot(
                PropertyKey::string(key),
                PropertySlot::Data {
                    value,
                    writable: false,
                    enumerable: false,
                    configurable: true,
                },
            );
        }
        func
    }

    /// IsCallable
    pub fn is_callable(&self, value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|obj| self.heap.get(obj).kind().is_callable())
    }

    /// IsConstructor
    pub fn is_constructor(&self, value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|obj| self.heap.get(obj).kind().as_constructor().is_some())
    }

    /// `typeof`, reporting callables as `"function"`
    pub fn type_of(&self, value: &Value) -> &'static str {
        if self.is_callable(value) {
            "function"
        } else {
            value.type_of()
        }
    }

    /// Call `func` with `this` and `args`
    pub fn call(&mut self, func: &Value, this: &Value, args: &[Value]) -> VmResult<Value> {
        let Some(obj) = func.as_object() else {
            return Err(VmError::type_error(format!(
                "{} is not a function",
                func.display_string()
            )));
        };
        match self.heap.get_mut(obj).kind_mut() {
            ObjectKind::Function(data) => {
                let native = data.native.clone();
                native(self, this, args)
            }
            ObjectKind::Foreign(host) if host.is_callable() => host.call(this, args),
            _ => Err(VmError::type_error("object is not a function")),
        }
    }

    /// `new func(...args)`
    pub fn construct(&mut self, func: &Value, args: &[Value]) -> VmResult<Value> {
        if !self.is_constructor(func) {
            return Err(VmError::type_error(format!(
                "{} is not a constructor",
                func.display_string()
            )));
        }
        let ctor = func.as_object().ok_or_else(|| VmError::internal("constructor without object"))?;
        let proto = match self.get(ctor, "prototype")? {
            Value::Object(p) => p,
            _ => self.intrinsics.object_prototype,
        };
        let this = self.create_object_with_proto(Some(proto));
        let result = self.call(func, &Value::Object(this), args)?;
        Ok(if result.is_object() {
            result
        } else {
            Value::Object(this)
        })
    }

    // ---------------------------------------------------------------
    // Builtin object shapes
    // ---------------------------------------------------------------

    /// Array-like from a list: indexed elements plus `length`, inheriting
    /// `%Array.prototype%` (and with it `@@iterator`)
    pub fn create_array_from_list(&mut self, values: impl IntoIterator<Item = Value>) -> ObjectRef {
        let proto = self.intrinsics.array_prototype;
        let array = self.alloc(ObjectKind::Ordinary, Some(proto));
        let record = self.heap.get_mut(array);
        let mut length = 0u32;
        for value in values {
            record.insert_slot(PropertyKey::Index(length), PropertySlot::data(value));
            length += 1;
        }
        record.insert_slot(
            PropertyKey::string("length"),
            PropertySlot::Data {
                value: Value::number(length as f64),
                writable: true,
                enumerable: false,
                configurable: false,
            },
        );
        array
    }

    /// `{ value, done }`
    pub fn create_iter_result_object(&mut self, value: Value, done: bool) -> ObjectRef {
        let result = self.create_object();
        let record = self.heap.get_mut(result);
        record.insert_slot(PropertyKey::string("value"), PropertySlot::data(value));
        record.insert_slot(PropertyKey::string("done"), PropertySlot::data(Value::Boolean(done)));
        result
    }

    /// Error object with `name` and `message`
    pub fn create_error(&mut self, name: &str, message: &str) -> ObjectRef {
        let proto = self.intrinsics.object_prototype;
        let error = self.alloc(ObjectKind::Error, Some(proto));
        self.define_builtin(error, "name", Value::string(name));
        self.define_builtin(error, "message", Value::string(message));
        error
    }

    /// Catchable script value for a non-fatal error. Fatal errors are
    /// handed back unchanged.
    pub fn error_to_value(&mut self, err: VmError) -> VmResult<Value> {
        match err {
            VmError::Exception(thrown) => Ok(thrown.value),
            VmError::TypeError(message) => {
                Ok(Value::Object(self.create_error("TypeError", &message)))
            }
            VmError::RangeError(message) => {
                Ok(Value::Object(self.create_error("RangeError", &message)))
            }
            fatal => Err(fatal),
        }
    }
}
