//! Object records
//!
//! Each object is a property table plus an extensible flag, a prototype
//! handle and a kind tag. Behavior that differs between kinds (callable,
//! constructor, iterable, host-provided storage) is reached through the
//! capability queries on [`ObjectKind`], not through subtyping.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::error::VmResult;
use crate::generator::GeneratorRecord;
use crate::property::{PropertyKey, PropertySlot};
use crate::realm::Realm;
use crate::value::{ObjectRef, Value};

/// Native function signature: `(realm, this, args)`
pub type NativeFn = Rc<dyn Fn(&mut Realm, &Value, &[Value]) -> VmResult<Value>>;

/// Property storage, insertion ordered
pub type PropertyMap = IndexMap<PropertyKey, PropertySlot, FxBuildHasher>;

/// Callable object payload
#[derive(Clone)]
pub struct FunctionData {
    /// Function name
    pub name: std::sync::Arc<str>,
    /// Declared parameter count
    pub length: u32,
    /// Implementation
    pub native: NativeFn,
    /// Whether `new` is allowed
    pub constructor: bool,
}

impl fmt::Debug for FunctionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("length", &self.length)
            .field("constructor", &self.constructor)
            .finish()
    }
}

/// Host object that manages its own properties
///
/// Foreign objects have no property table; every consumed object operation
/// is delegated to the host.
pub trait ForeignObject: fmt::Debug {
    /// Own property value
    fn get(&self, key: &PropertyKey) -> Option<Value>;

    /// Write an own property; false if the host refused
    fn put(&mut self, key: &PropertyKey, value: Value) -> bool;

    /// Own property existence
    fn has(&self, key: &PropertyKey) -> bool;

    /// Remove an own property; false if the host refused
    fn delete(&mut self, key: &PropertyKey) -> bool;

    /// Own keys in host order
    fn own_keys(&self) -> Vec<PropertyKey>;

    /// Whether [`ForeignObject::call`] is implemented
    fn is_callable(&self) -> bool {
        false
    }

    /// Invoke the host object as a function
    fn call(&mut self, _this: &Value, _args: &[Value]) -> VmResult<Value> {
        Err(crate::error::VmError::type_error("foreign object is not a function"))
    }
}

/// Cursor over an array-like, read live on every step
#[derive(Debug, Clone)]
pub struct ListIteratorState {
    /// Array-like being walked
    pub target: ObjectRef,
    /// Next index to read
    pub next_index: u64,
    /// Set once the end was reached
    pub done: bool,
}

/// Object kind tag
pub enum ObjectKind {
    /// Plain object
    Ordinary,
    /// Native callable
    Function(FunctionData),
    /// Generator instance
    Generator(Box<GeneratorRecord>),
    /// Iterator over an array-like
    ListIterator(ListIteratorState),
    /// Error object created from a `TypeError`/`RangeError`
    Error,
    /// Host object
    Foreign(Box<dyn ForeignObject>),
}

impl fmt::Debug for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordinary => f.write_str("Ordinary"),
            Self::Function(data) => data.fmt(f),
            Self::Generator(record) => write!(f, "Generator({:?})", record.state()),
            Self::ListIterator(state) => state.fmt(f),
            Self::Error => f.write_str("Error"),
            Self::Foreign(host) => write!(f, "Foreign({host:?})"),
        }
    }
}

impl ObjectKind {
    /// Can be called
    pub fn is_callable(&self) -> bool {
        match self {
            Self::Function(_) => true,
            Self::Foreign(host) => host.is_callable(),
            _ => false,
        }
    }

    /// Function payload if `new` is allowed
    pub fn as_constructor(&self) -> Option<&FunctionData> {
        match self {
            Self::Function(data) if data.constructor => Some(data),
            _ => None,
        }
    }

    /// Kinds that carry their own iteration state
    pub fn as_iterable(&self) -> Option<IterableKind> {
        match self {
            Self::Generator(_) => Some(IterableKind::Generator),
            Self::ListIterator(_) => Some(IterableKind::ListIterator),
            _ => None,
        }
    }

    /// Host object, if any
    pub fn as_foreign(&self) -> Option<&dyn ForeignObject> {
        match self {
            Self::Foreign(host) => Some(host.as_ref()),
            _ => None,
        }
    }

    /// Mutable host object, if any
    pub fn as_foreign_mut(&mut self) -> Option<&mut (dyn ForeignObject + 'static)> {
        match self {
            Self::Foreign(host) => Some(host.as_mut()),
            _ => None,
        }
    }
}

/// Built-in iteration capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterableKind {
    /// Generator instance
    Generator,
    /// Array-like iterator
    ListIterator,
}

/// An object in the arena
#[derive(Debug)]
pub struct ObjectRecord {
    kind: ObjectKind,
    properties: PropertyMap,
    prototype: Option<ObjectRef>,
    parent_scope: Option<ObjectRef>,
    extensible: bool,
}

impl ObjectRecord {
    /// Create an extensible record with no properties
    pub fn new(kind: ObjectKind, prototype: Option<ObjectRef>) -> Self {
        Self {
            kind,
            properties: PropertyMap::default(),
            prototype,
            parent_scope: None,
            extensible: true,
        }
    }

    /// Kind tag
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Mutable kind tag
    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    /// Prototype handle
    pub fn prototype(&self) -> Option<ObjectRef> {
        self.prototype
    }

    pub(crate) fn set_prototype_unchecked(&mut self, prototype: Option<ObjectRef>) {
        self.prototype = prototype;
    }

    /// Enclosing scope object
    pub fn parent_scope(&self) -> Option<ObjectRef> {
        self.parent_scope
    }

    /// Set the enclosing scope object
    pub fn set_parent_scope(&mut self, scope: Option<ObjectRef>) {
        self.parent_scope = scope;
    }

    /// Own slot
    pub fn get_own(&self, key: &PropertyKey) -> Option<&PropertySlot> {
        self.properties.get(key)
    }

    /// Mutable own slot
    pub fn get_own_mut(&mut self, key: &PropertyKey) -> Option<&mut PropertySlot> {
        self.properties.get_mut(key)
    }

    /// Own slot existence
    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.properties.contains_key(key)
    }

    /// Insert or overwrite a slot. An existing key keeps its position.
    pub fn insert_slot(&mut self, key: PropertyKey, slot: PropertySlot) {
        self.properties.insert(key, slot);
    }

    /// Remove a slot, preserving the order of the rest
    pub fn remove(&mut self, key: &PropertyKey) -> Option<PropertySlot> {
        self.properties.shift_remove(key)
    }

    /// Number of own properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// No own properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Own keys: indices ascending, then strings, then symbols, the last
    /// two in insertion order.
    pub fn ordered_keys(&self, include_non_enumerable: bool, include_symbols: bool) -> Vec<PropertyKey> {
        self.ordered_keys_with(include_non_enumerable, include_symbols, true)
    }

    /// Like [`ObjectRecord::ordered_keys`]; with `indices_first == false`
    /// integer keys stay in insertion order among the strings.
    pub fn ordered_keys_with(
        &self,
        include_non_enumerable: bool,
        include_symbols: bool,
        indices_first: bool,
    ) -> Vec<PropertyKey> {
        let visible = self
            .properties
            .iter()
            .filter(|(_, slot)| include_non_enumerable || slot.enumerable())
            .map(|(key, _)| key);

        let mut indices = Vec::new();
        let mut strings = Vec::new();
        let mut symbols = Vec::new();
        for key in visible {
            match key {
                PropertyKey::Index(_) if indices_first => indices.push(key.clone()),
                PropertyKey::Index(_) | PropertyKey::String(_) => strings.push(key.clone()),
                PropertyKey::Symbol(_) => {
                    if include_symbols {
                        symbols.push(key.clone());
                    }
                }
            }
        }
        indices.sort_unstable_by_key(|key| match key {
            PropertyKey::Index(i) => *i,
            _ => 0,
        });
        indices.extend(strings);
        indices.extend(symbols);
        indices
    }

    /// Extensible flag
    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    /// Change extensibility. Only `false` is accepted once revoked;
    /// returns whether the requested state holds afterwards.
    pub fn set_extensible(&mut self, extensible: bool) -> bool {
        if extensible && !self.extensible {
            return false;
        }
        self.extensible = extensible;
        true
    }
}
