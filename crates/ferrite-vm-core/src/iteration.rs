//! Iteration protocol
//!
//! Any object with a callable `next` returning `{ value, done }` objects is
//! an iterator; any value with a callable `@@iterator` is iterable.
//! Generators both implement and consume this protocol.

use tracing::debug;

use crate::error::{VmError, VmResult};
use crate::object::{ListIteratorState, ObjectKind};
use crate::operations::{get_method, length_of_array_like};
use crate::property::PropertyKey;
use crate::realm::Realm;
use crate::value::{ObjectRef, Value};

/// Result of advancing an iterator
#[derive(Debug, Clone, PartialEq)]
pub struct IteratorResult {
    /// The yielded/returned value
    pub value: Value,
    /// Whether the iterator is done
    pub done: bool,
}

impl IteratorResult {
    /// Create a new iterator result
    pub fn new(value: Value, done: bool) -> Self {
        Self { value, done }
    }

    /// Create a "not done" result
    pub fn yielded(value: Value) -> Self {
        Self { value, done: false }
    }

    /// Create a "done" result
    pub fn done(value: Value) -> Self {
        Self { value, done: true }
    }

    /// Create a "done with undefined" result
    pub fn done_undefined() -> Self {
        Self {
            value: Value::undefined(),
            done: true,
        }
    }

    /// Materialize as a `{ value, done }` object
    pub fn into_object(self, realm: &mut Realm) -> ObjectRef {
        realm.create_iter_result_object(self.value, self.done)
    }
}

/// An iterator together with its cached `next` method
#[derive(Debug, Clone)]
pub struct IteratorRecord {
    /// Iterator object
    pub iterator: ObjectRef,
    /// `next`, read once when the record was created
    pub next_method: Value,
    /// Set once the iterator finished or failed
    pub done: bool,
}

/// GetIterator (sync)
pub fn get_iterator(realm: &mut Realm, iterable: &Value) -> VmResult<IteratorRecord> {
    let key = PropertyKey::Symbol(realm.symbols().iterator.clone());
    let Some(method) = get_method(realm, iterable, &key)? else {
        return Err(VmError::type_error(format!(
            "{} is not iterable",
            iterable.display_string()
        )));
    };
    let iterator = realm.call(&method, iterable, &[])?;
    let Some(iterator) = iterator.as_object() else {
        return Err(VmError::type_error(
            "Result of the Symbol.iterator method is not an object",
        ));
    };
    let next_method = realm.get(iterator, "next")?;
    Ok(IteratorRecord {
        iterator,
        next_method,
        done: false,
    })
}

/// IteratorNext: call `next`, require an object back
pub fn iterator_next(
    realm: &mut Realm,
    record: &IteratorRecord,
    value: Option<Value>,
) -> VmResult<ObjectRef> {
    let args: Vec<Value> = value.into_iter().collect();
    let result = realm.call(&record.next_method, &Value::Object(record.iterator), &args)?;
    result.as_object().ok_or_else(|| {
        VmError::type_error(format!(
            "Iterator result {} is not an object",
            result.display_string()
        ))
    })
}

/// IteratorComplete
pub fn iterator_complete(realm: &mut Realm, result: ObjectRef) -> VmResult<bool> {
    Ok(realm.get(result, "done")?.to_boolean())
}

/// IteratorValue
pub fn iterator_value(realm: &mut Realm, result: ObjectRef) -> VmResult<Value> {
    realm.get(result, "value")
}

/// IteratorStep: the next result object, or `None` when done. Any failure
/// marks the record done.
pub fn iterator_step(realm: &mut Realm, record: &mut IteratorRecord) -> VmResult<Option<ObjectRef>> {
    let step = iterator_next(realm, record, None)
        .and_then(|result| Ok((result, iterator_complete(realm, result)?)));
    match step {
        Ok((_, true)) => {
            record.done = true;
            Ok(None)
        }
        Ok((result, false)) => Ok(Some(result)),
        Err(err) => {
            record.done = true;
            Err(err)
        }
    }
}

/// IteratorStepValue: the next value, or `None` when done
pub fn iterator_step_value(realm: &mut Realm, record: &mut IteratorRecord) -> VmResult<Option<Value>> {
    let Some(result) = iterator_step(realm, record)? else {
        return Ok(None);
    };
    match iterator_value(realm, result) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            record.done = true;
            Err(err)
        }
    }
}

/// IteratorClose: call `return` if present. An abrupt `completion` wins
/// over anything `return` does; a normal one is replaced by errors from
/// `return` or a non-object result.
pub fn iterator_close(
    realm: &mut Realm,
    record: &IteratorRecord,
    completion: VmResult<Value>,
) -> VmResult<Value> {
    if let Err(err) = &completion {
        if err.is_fatal() {
            return completion;
        }
        debug!(target: "ferrite::iter", iterator = record.iterator.index(), error = %err, "closing iterator after failure");
    }

    let iterator = Value::Object(record.iterator);
    let inner = get_method(realm, &iterator, &PropertyKey::string("return")).and_then(|method| {
        match method {
            Some(method) => realm.call(&method, &iterator, &[]).map(Some),
            None => Ok(None),
        }
    });

    if completion.is_err() {
        return match inner {
            Err(err) if err.is_fatal() => Err(err),
            _ => completion,
        };
    }
    match inner? {
        Some(result) if !result.is_object() => Err(VmError::type_error(
            "Iterator result is not an object",
        )),
        _ => completion,
    }
}

/// Collect every remaining value
pub fn iterate_to_list(realm: &mut Realm, record: &mut IteratorRecord) -> VmResult<Vec<Value>> {
    let mut values = Vec::new();
    while let Some(value) = iterator_step_value(realm, record)? {
        values.push(value);
    }
    Ok(values)
}

/// Iterator over an array-like, reading `length` and elements on each step
pub fn create_list_iterator(realm: &mut Realm, target: ObjectRef) -> ObjectRef {
    let proto = realm.intrinsics().list_iterator_prototype;
    realm.alloc(
        ObjectKind::ListIterator(ListIteratorState {
            target,
            next_index: 0,
            done: false,
        }),
        Some(proto),
    )
}

fn list_iterator_next(realm: &mut Realm, this: &Value) -> VmResult<IteratorResult> {
    let iterator = this
        .as_object()
        .ok_or_else(|| VmError::type_error("next method called on incompatible receiver"))?;
    let (target, index) = match realm.object(iterator).kind() {
        ObjectKind::ListIterator(state) if state.done => return Ok(IteratorResult::done_undefined()),
        ObjectKind::ListIterator(state) => (state.target, state.next_index),
        _ => {
            return Err(VmError::type_error(
                "next method called on incompatible receiver",
            ));
        }
    };

    let length = length_of_array_like(realm, target)?;
    let finished = index >= length;
    if let ObjectKind::ListIterator(state) = realm.object_mut(iterator).kind_mut() {
        if finished {
            state.done = true;
        } else {
            state.next_index += 1;
        }
    }
    if finished {
        return Ok(IteratorResult::done_undefined());
    }
    let key = match u32::try_from(index) {
        Ok(i) if i < u32::MAX => PropertyKey::Index(i),
        _ => PropertyKey::string(&index.to_string()),
    };
    Ok(IteratorResult::yielded(realm.get(target, key)?))
}

/// `%IteratorPrototype%[@@iterator]`, `%ListIteratorPrototype%.next` and
/// `%Array.prototype%[@@iterator]`
pub(crate) fn install_intrinsics(realm: &mut Realm) {
    let intrinsics = *realm.intrinsics();
    let symbols = realm.symbols().clone();

    realm.define_method(
        intrinsics.iterator_prototype,
        symbols.iterator.clone(),
        "[Symbol.iterator]",
        0,
        |_, this, _| Ok(this.clone()),
    );

    realm.define_method(
        intrinsics.list_iterator_prototype,
        "next",
        "next",
        0,
        |realm, this, _| {
            let result = list_iterator_next(realm, this)?;
            Ok(Value::Object(result.into_object(realm)))
        },
    );
    realm.define_builtin(
        intrinsics.list_iterator_prototype,
        symbols.to_string_tag.clone(),
        Value::string("Array Iterator"),
    );

    realm.define_method(
        intrinsics.array_prototype,
        symbols.iterator,
        "values",
        0,
        |realm, this, _| {
            let target = this
                .as_object()
                .ok_or_else(|| VmError::type_error("Array.prototype.values called on non-object"))?;
            Ok(Value::Object(create_list_iterator(realm, target)))
        },
    );
}
