//! Property keys, descriptors and materialized slots
//!
//! A [`PropertyDescriptor`] is a partial update request; a [`PropertySlot`]
//! is what an object actually stores. [`reconcile`] decides how a
//! descriptor changes a slot without touching any object, so the same
//! algorithm serves both the feasibility check and the real update.

use std::sync::Arc;

use crate::error::VmResult;
use crate::value::{Symbol, Value, number_to_string, same_value};

/// Largest valid array index (2^32 - 2)
pub const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// Property key (string, array index or symbol)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String property key
    String(Arc<str>),
    /// Canonical array index
    Index(u32),
    /// Symbol property key
    Symbol(Symbol),
}

impl PropertyKey {
    /// Create a key from text; canonical index strings become `Index`
    pub fn string(s: &str) -> Self {
        match parse_array_index(s) {
            Some(index) => Self::Index(index),
            None => Self::String(Arc::from(s)),
        }
    }

    /// Create an index key
    pub fn index(i: u32) -> Self {
        Self::Index(i)
    }

    /// ToPropertyKey: symbols stay symbols, everything else is stringified
    pub fn from_value(value: &Value) -> VmResult<Self> {
        match value {
            Value::Symbol(sym) => Ok(Self::Symbol(sym.clone())),
            Value::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= MAX_ARRAY_INDEX as f64 => {
                Ok(Self::Index(*n as u32))
            }
            other => Ok(Self::string(&other.to_js_string()?)),
        }
    }

    /// The same key with string-encoded indices folded into `Index`
    pub fn canonical(&self) -> Self {
        match self {
            Self::String(s) => Self::string(s),
            other => other.clone(),
        }
    }

    /// Check if symbol key
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// The key as a script value (indices become strings)
    pub fn to_value(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Index(i) => Value::string(i.to_string()),
            Self::Symbol(sym) => Value::Symbol(sym.clone()),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<u32> for PropertyKey {
    fn from(i: u32) -> Self {
        Self::Index(i)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Index(i) => write!(f, "{i}"),
            Self::Symbol(sym) => write!(f, "{sym}"),
        }
    }
}

/// `"0"`..`"4294967294"` without leading zeros
fn parse_array_index(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || bytes.len() > 10 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    let n: u64 = s.parse().ok()?;
    (n <= MAX_ARRAY_INDEX as u64).then_some(n as u32)
}

/// Key for a numeric value, going through Number::toString
pub(crate) fn key_for_number(n: f64) -> PropertyKey {
    PropertyKey::string(&number_to_string(n))
}

/// Descriptor family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Has `value` and/or `writable`
    Data,
    /// Has `get` and/or `set`
    Accessor,
    /// Only `enumerable`/`configurable` (or nothing)
    Generic,
}

/// Partial property descriptor
///
/// `get`/`set`, when present, hold `undefined` or a callable object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDescriptor {
    /// `[[Value]]`
    pub value: Option<Value>,
    /// `[[Writable]]`
    pub writable: Option<bool>,
    /// `[[Get]]`
    pub get: Option<Value>,
    /// `[[Set]]`
    pub set: Option<Value>,
    /// `[[Enumerable]]`
    pub enumerable: Option<bool>,
    /// `[[Configurable]]`
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    /// Fully populated data descriptor
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: Some(value),
            writable: Some(writable),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    /// Fully populated accessor descriptor
    pub fn accessor(get: Value, set: Value, enumerable: bool, configurable: bool) -> Self {
        Self {
            get: Some(get),
            set: Some(set),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
            ..Default::default()
        }
    }

    /// Descriptor that only sets `value`
    pub fn value(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }

    /// Set `[[Value]]`
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Set `[[Writable]]`
    pub fn with_writable(mut self, writable: bool) -> Self {
        self.writable = Some(writable);
        self
    }

    /// Set `[[Get]]`
    pub fn with_get(mut self, get: Value) -> Self {
        self.get = Some(get);
        self
    }

    /// Set `[[Set]]`
    pub fn with_set(mut self, set: Value) -> Self {
        self.set = Some(set);
        self
    }

    /// Set `[[Enumerable]]`
    pub fn with_enumerable(mut self, enumerable: bool) -> Self {
        self.enumerable = Some(enumerable);
        self
    }

    /// Set `[[Configurable]]`
    pub fn with_configurable(mut self, configurable: bool) -> Self {
        self.configurable = Some(configurable);
        self
    }

    /// Which family the present fields belong to
    pub fn kind(&self) -> DescriptorKind {
        classify(self)
    }

    /// No field present at all
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
            && self.writable.is_none()
            && self.get.is_none()
            && self.set.is_none()
            && self.enumerable.is_none()
            && self.configurable.is_none()
    }

    /// Fields from both the data and the accessor family
    pub fn is_mixed(&self) -> bool {
        (self.value.is_some() || self.writable.is_some())
            && (self.get.is_some() || self.set.is_some())
    }
}

/// Classify a descriptor. Accessor wins if `get`/`set` is present.
pub fn classify(desc: &PropertyDescriptor) -> DescriptorKind {
    if desc.get.is_some() || desc.set.is_some() {
        DescriptorKind::Accessor
    } else if desc.value.is_some() || desc.writable.is_some() {
        DescriptorKind::Data
    } else {
        DescriptorKind::Generic
    }
}

/// A materialized own property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySlot {
    /// Data property
    Data {
        /// Stored value
        value: Value,
        /// Writable
        writable: bool,
        /// Enumerable
        enumerable: bool,
        /// Configurable
        configurable: bool,
    },
    /// Accessor property; `get`/`set` are `undefined` or callable
    Accessor {
        /// Getter
        get: Value,
        /// Setter
        set: Value,
        /// Enumerable
        enumerable: bool,
        /// Configurable
        configurable: bool,
    },
}

impl PropertySlot {
    /// Writable, enumerable, configurable data property
    pub fn data(value: Value) -> Self {
        Self::Data {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Writable, non-enumerable, configurable data property (builtins)
    pub fn hidden(value: Value) -> Self {
        Self::Data {
            value,
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// Build a slot for an absent key, defaulting every missing field
    pub fn from_descriptor(desc: &PropertyDescriptor) -> Self {
        let enumerable = desc.enumerable.unwrap_or(false);
        let configurable = desc.configurable.unwrap_or(false);
        match classify(desc) {
            DescriptorKind::Accessor => Self::Accessor {
                get: desc.get.clone().unwrap_or_default(),
                set: desc.set.clone().unwrap_or_default(),
                enumerable,
                configurable,
            },
            DescriptorKind::Data | DescriptorKind::Generic => Self::Data {
                value: desc.value.clone().unwrap_or_default(),
                writable: desc.writable.unwrap_or(false),
                enumerable,
                configurable,
            },
        }
    }

    /// Complete descriptor for this slot
    pub fn to_descriptor(&self) -> PropertyDescriptor {
        match self {
            Self::Data {
                value,
                writable,
                enumerable,
                configurable,
            } => PropertyDescriptor::data(value.clone(), *writable, *enumerable, *configurable),
            Self::Accessor {
                get,
                set,
                enumerable,
                configurable,
            } => PropertyDescriptor::accessor(get.clone(), set.clone(), *enumerable, *configurable),
        }
    }

    /// Data or accessor
    pub fn kind(&self) -> DescriptorKind {
        match self {
            Self::Data { .. } => DescriptorKind::Data,
            Self::Accessor { .. } => DescriptorKind::Accessor,
        }
    }

    /// Check if data property
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }

    /// Enumerable flag
    pub fn enumerable(&self) -> bool {
        match self {
            Self::Data { enumerable, .. } | Self::Accessor { enumerable, .. } => *enumerable,
        }
    }

    /// Configurable flag
    pub fn configurable(&self) -> bool {
        match self {
            Self::Data { configurable, .. } | Self::Accessor { configurable, .. } => *configurable,
        }
    }

    /// Writable flag; accessors are never writable
    pub fn writable(&self) -> bool {
        matches!(self, Self::Data { writable: true, .. })
    }

    /// Stored value of a data property
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    /// Overwrite every field the descriptor carries. Fields of the other
    /// family are ignored.
    fn apply(&mut self, desc: &PropertyDescriptor) {
        match self {
            Self::Data {
                value,
                writable,
                enumerable,
                configurable,
            } => {
                if let Some(v) = &desc.value {
                    *value = v.clone();
                }
                if let Some(w) = desc.writable {
                    *writable = w;
                }
                apply_flags(enumerable, configurable, desc);
            }
            Self::Accessor {
                get,
                set,
                enumerable,
                configurable,
            } => {
                if let Some(g) = &desc.get {
                    *get = g.clone();
                }
                if let Some(s) = &desc.set {
                    *set = s.clone();
                }
                apply_flags(enumerable, configurable, desc);
            }
        }
    }

    /// Same flags, opposite family, family fields reset to defaults
    fn converted(&self) -> Self {
        let (enumerable, configurable) = (self.enumerable(), self.configurable());
        match self {
            Self::Data { .. } => Self::Accessor {
                get: Value::Undefined,
                set: Value::Undefined,
                enumerable,
                configurable,
            },
            Self::Accessor { .. } => Self::Data {
                value: Value::Undefined,
                writable: false,
                enumerable,
                configurable,
            },
        }
    }
}

fn apply_flags(enumerable: &mut bool, configurable: &mut bool, desc: &PropertyDescriptor) {
    if let Some(e) = desc.enumerable {
        *enumerable = e;
    }
    if let Some(c) = desc.configurable {
        *configurable = c;
    }
}

/// Outcome of reconciling a descriptor against the current slot
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// The update is not allowed
    Reject,
    /// Allowed, nothing changes
    Keep,
    /// Allowed, the key must now hold this slot
    Replace(PropertySlot),
}

impl Reconciliation {
    /// The update is allowed
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Self::Reject)
    }
}

/// ValidateAndApplyPropertyDescriptor without the apply step.
///
/// The branch order is observable: later checks assume the earlier ones
/// already ruled their cases out.
pub fn reconcile(
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&PropertySlot>,
) -> Reconciliation {
    let Some(current) = current else {
        if !extensible {
            return Reconciliation::Reject;
        }
        return Reconciliation::Replace(PropertySlot::from_descriptor(desc));
    };

    if desc.is_empty() {
        return Reconciliation::Keep;
    }

    if !current.configurable() {
        if desc.configurable == Some(true) {
            return Reconciliation::Reject;
        }
        if desc.enumerable.is_some_and(|e| e != current.enumerable()) {
            return Reconciliation::Reject;
        }
    }

    let kind = classify(desc);
    if kind == DescriptorKind::Generic {
        let mut slot = current.clone();
        slot.apply(desc);
        return Reconciliation::Replace(slot);
    }

    if kind != current.kind() {
        if !current.configurable() {
            return Reconciliation::Reject;
        }
        let mut slot = current.converted();
        slot.apply(desc);
        return Reconciliation::Replace(slot);
    }

    match current {
        PropertySlot::Data {
            value,
            writable,
            configurable,
            ..
        } => {
            if !*configurable && !*writable {
                if desc.writable == Some(true) {
                    return Reconciliation::Reject;
                }
                if desc.value.as_ref().is_some_and(|v| !same_value(v, value)) {
                    return Reconciliation::Reject;
                }
                return Reconciliation::Keep;
            }
        }
        PropertySlot::Accessor {
            get,
            set,
            configurable,
            ..
        } => {
            if !*configurable {
                if desc.set.as_ref().is_some_and(|s| !same_value(s, set)) {
                    return Reconciliation::Reject;
                }
                if desc.get.as_ref().is_some_and(|g| !same_value(g, get)) {
                    return Reconciliation::Reject;
                }
                return Reconciliation::Keep;
            }
        }
    }

    let mut slot = current.clone();
    slot.apply(desc);
    Reconciliation::Replace(slot)
}

/// IsCompatiblePropertyDescriptor: pure feasibility check
pub fn is_compatible(
    extensible: bool,
    desc: &PropertyDescriptor,
    current: Option<&PropertySlot>,
) -> bool {
    reconcile(extensible, desc, current).is_allowed()
}
