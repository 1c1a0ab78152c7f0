//! Script values
//!
//! Objects are handles into the realm's arena, so `Value` is cheap to clone
//! and carries no lifetime.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{VmError, VmResult};

/// Handle to an object in a realm's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(pub(crate) usize);

impl ObjectRef {
    /// Arena slot of this handle
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A symbol: unique identity plus an optional description.
///
/// Equality and hashing use the identity only. Identities are allocated
/// per realm, so a symbol is only meaningful inside the realm that
/// created it; the same holds for [`ObjectRef`] and any [`Value`]
/// holding either.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u32,
    description: Option<Arc<str>>,
}

impl Symbol {
    pub(crate) fn new(id: u32, description: Option<Arc<str>>) -> Self {
        Self { id, description }
    }

    /// Per-realm identity
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Description given at creation
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

/// A script value
///
/// `PartialEq` is strict equality (`NaN != NaN`, `+0 == -0`); use
/// [`same_value`] where identity semantics are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// `undefined`
    #[default]
    Undefined,
    /// `null`
    Null,
    /// Boolean
    Boolean(bool),
    /// IEEE-754 double
    Number(f64),
    /// Immutable string
    String(Arc<str>),
    /// Symbol
    Symbol(Symbol),
    /// Object handle
    Object(ObjectRef),
}

impl Value {
    /// `undefined`
    #[inline]
    pub const fn undefined() -> Self {
        Self::Undefined
    }

    /// `null`
    #[inline]
    pub const fn null() -> Self {
        Self::Null
    }

    /// Boolean value
    #[inline]
    pub const fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    /// Number value
    #[inline]
    pub const fn number(n: f64) -> Self {
        Self::Number(n)
    }

    /// String value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Self::String(s.into())
    }

    /// Object value
    #[inline]
    pub const fn object(obj: ObjectRef) -> Self {
        Self::Object(obj)
    }

    /// Check if undefined
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check if undefined or null
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Check if object
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Object handle, if this is an object
    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            Self::Object(obj) => Some(*obj),
            _ => None,
        }
    }

    /// Number, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Symbol, if this is a symbol
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    /// `typeof` result, without the callable check (see `Realm::type_of`)
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "object",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Object(_) => "object",
        }
    }

    /// ToBoolean
    pub fn to_boolean(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Boolean(b) => *b,
            Self::Number(n) => !(*n == 0.0 || n.is_nan()),
            Self::String(s) => !s.is_empty(),
            Self::Symbol(_) | Self::Object(_) => true,
        }
    }

    /// ToPropertyKey
    pub fn to_property_key(&self) -> VmResult<crate::property::PropertyKey> {
        crate::property::PropertyKey::from_value(self)
    }

    /// ToString for primitives. Symbols are rejected; objects use their
    /// default tag since no user-visible `toString` is consulted here.
    pub fn to_js_string(&self) -> VmResult<Arc<str>> {
        Ok(match self {
            Self::Undefined => Arc::from("undefined"),
            Self::Null => Arc::from("null"),
            Self::Boolean(true) => Arc::from("true"),
            Self::Boolean(false) => Arc::from("false"),
            Self::Number(n) => Arc::from(number_to_string(*n)),
            Self::String(s) => s.clone(),
            Self::Symbol(_) => {
                return Err(VmError::type_error(
                    "Cannot convert a Symbol value to a string",
                ));
            }
            Self::Object(_) => Arc::from("[object Object]"),
        })
    }

    /// ToNumber for primitives
    pub fn to_number(&self) -> VmResult<f64> {
        match self {
            Self::Undefined => Ok(f64::NAN),
            Self::Null => Ok(0.0),
            Self::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Self::Number(n) => Ok(*n),
            Self::String(s) => Ok(string_to_number(s)),
            Self::Symbol(_) => Err(VmError::type_error(
                "Cannot convert a Symbol value to a number",
            )),
            Self::Object(_) => Err(VmError::type_error(
                "Cannot convert object to primitive value",
            )),
        }
    }

    /// Best-effort text for diagnostics; never fails
    pub fn display_string(&self) -> String {
        match self {
            Self::Symbol(sym) => sym.to_string(),
            other => other
                .to_js_string()
                .map(|s| s.to_string())
                .unwrap_or_default(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Self::Object(obj)
    }
}

/// SameValue: `NaN` equals `NaN`, `+0` differs from `-0`, objects and
/// symbols compare by identity.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_nan() && y.is_nan() {
                true
            } else {
                x == y && x.is_sign_negative() == y.is_sign_negative()
            }
        }
        _ => a == b,
    }
}

/// SameValueZero: like [`same_value`] but `+0` equals `-0`
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        _ => a == b,
    }
}

/// Number::toString(10)
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let mut buf = ryu_js::Buffer::new();
    buf.format(n).to_string()
}

/// StringToNumber: decimal, `Infinity` and `0x`/`0o`/`0b` literals
fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&trimmed[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts "inf"/"nan" spellings that scripts do not
        t if t.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => f64::NAN,
        t => t.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// ToLength: clamp to `0..=2^53-1`
pub fn to_length(n: f64) -> u64 {
    if n.is_nan() || n <= 0.0 {
        return 0;
    }
    let max = crate::config::MAX_SAFE_INTEGER as f64;
    if n >= max {
        return crate::config::MAX_SAFE_INTEGER;
    }
    n.trunc() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_identity_within_realm() {
        let mut realm = crate::realm::Realm::default();
        let a = realm.new_symbol(Some("tag"));
        let b = realm.new_symbol(Some("tag"));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(same_value(&Value::Symbol(a.clone()), &Value::Symbol(a)));
    }

    #[test]
    fn test_same_value() {
        assert!(same_value(&Value::number(f64::NAN), &Value::number(f64::NAN)));
        assert!(!same_value(&Value::number(0.0), &Value::number(-0.0)));
        assert!(same_value_zero(&Value::number(0.0), &Value::number(-0.0)));
        assert!(!same_value(&Value::Undefined, &Value::Null));
        assert!(same_value(&Value::string("a"), &Value::string("a")));
        assert!(!same_value(
            &Value::object(ObjectRef(1)),
            &Value::object(ObjectRef(2))
        ));
    }

    #[test]
    fn test_symbol_identity() {
        let a = Symbol::new(1, Some(Arc::from("x")));
        let b = Symbol::new(2, Some(Arc::from("x")));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.to_string(), "Symbol(x)");
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.1), "0.1");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }

    #[test]
    fn test_to_boolean() {
        assert!(!Value::number(f64::NAN).to_boolean());
        assert!(!Value::string("").to_boolean());
        assert!(Value::string("0").to_boolean());
        assert!(Value::object(ObjectRef(0)).to_boolean());
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Value::string(" 42 ").to_number().unwrap(), 42.0);
        assert_eq!(Value::string("0x10").to_number().unwrap(), 16.0);
        assert!(Value::string("inf").to_number().unwrap().is_nan());
        assert_eq!(Value::string("").to_number().unwrap(), 0.0);
        assert!(Value::Undefined.to_number().unwrap().is_nan());
        assert!(Value::Symbol(Symbol::new(0, None)).to_number().is_err());
    }

    #[test]
    fn test_to_length() {
        assert_eq!(to_length(-3.0), 0);
        assert_eq!(to_length(f64::NAN), 0);
        assert_eq!(to_length(3.7), 3);
        assert_eq!(to_length(f64::INFINITY), crate::config::MAX_SAFE_INTEGER);
    }
}
