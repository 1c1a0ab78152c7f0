//! Generator state machine
//!
//! A generator object owns the interpreter's saved frame, a
//! [`Continuation`] that knows how to run it, and (during `yield*`) the
//! iterator it delegates to. The interpreter is external: this module only
//! drives the four-state lifecycle and the delegation protocol.
//!
//! ```text
//! SuspendedStart --next--> Executing --yield--> SuspendedYield
//!        |                     |                      |
//!   return/throw          return/throw           next/return/throw
//!        v                     v                      |
//!    Completed <-------------------------------------/
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::error::{SourceLocation, VmError, VmResult};
use crate::iteration::{
    IteratorRecord, IteratorResult, get_iterator, iterator_close, iterator_complete, iterator_next,
    iterator_value,
};
use crate::object::ObjectKind;
use crate::operations::get_method;
use crate::property::PropertyKey;
use crate::realm::Realm;
use crate::value::{ObjectRef, Value};

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Created, body not entered yet
    SuspendedStart,
    /// Paused at a `yield`
    SuspendedYield,
    /// Body (or a delegate) is running
    Executing,
    /// Finished; absorbing
    Completed,
}

/// Saved interpreter state. `resume_point` is an opaque position the
/// interpreter maps back to its own code offsets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorFrame {
    /// Where to continue
    pub resume_point: u32,
    /// Saved locals
    pub locals: Vec<Value>,
}

impl GeneratorFrame {
    /// Frame positioned at `resume_point`
    pub fn new(resume_point: u32, locals: Vec<Value>) -> Self {
        Self {
            resume_point,
            locals,
        }
    }
}

/// How the body is resumed
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// `next(value)`: the paused `yield` evaluates to `value`
    Next(Value),
    /// `return(value)`: unwind towards a `return value`
    Return(Value),
    /// `throw(value)`: raise `value` at the paused `yield`
    Throw(Value),
}

/// What the body did before pausing or finishing
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `yield value`
    Yield(Value),
    /// `yield* iterable`
    Delegate(Value),
    /// Finished normally
    Return(Value),
    /// Finished with an uncaught exception
    Throw {
        /// Thrown value
        value: Value,
        /// Where it was thrown
        location: Option<SourceLocation>,
    },
}

/// Interpreter hook that runs a generator body from its saved frame
pub trait Continuation {
    /// Run until the next yield, delegation, return or throw. An `Err`
    /// completes the generator and propagates unchanged.
    fn resume(
        &mut self,
        realm: &mut Realm,
        frame: &mut GeneratorFrame,
        completion: Completion,
    ) -> VmResult<Step>;
}

/// Continuation backed by a closure, see [`from_fn`]
pub struct FnContinuation<F>(F);

impl<F> Continuation for FnContinuation<F>
where
    F: FnMut(&mut Realm, &mut GeneratorFrame, Completion) -> VmResult<Step>,
{
    fn resume(
        &mut self,
        realm: &mut Realm,
        frame: &mut GeneratorFrame,
        completion: Completion,
    ) -> VmResult<Step> {
        (self.0)(realm, frame, completion)
    }
}

/// Build a continuation from a closure
pub fn from_fn<F>(f: F) -> FnContinuation<F>
where
    F: FnMut(&mut Realm, &mut GeneratorFrame, Completion) -> VmResult<Step>,
{
    FnContinuation(f)
}

/// Generator instance payload
pub struct GeneratorRecord {
    state: GeneratorState,
    frame: GeneratorFrame,
    continuation: Option<Box<dyn Continuation>>,
    delegate: Option<IteratorRecord>,
    last_location: Option<SourceLocation>,
}

impl fmt::Debug for GeneratorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRecord")
            .field("state", &self.state)
            .field("frame", &self.frame)
            .field("delegate", &self.delegate.as_ref().map(|d| d.iterator))
            .field("last_location", &self.last_location)
            .finish_non_exhaustive()
    }
}

impl GeneratorRecord {
    fn new(continuation: Box<dyn Continuation>, frame: GeneratorFrame) -> Self {
        Self {
            state: GeneratorState::SuspendedStart,
            frame,
            continuation: Some(continuation),
            delegate: None,
            last_location: None,
        }
    }

    /// Current state
    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Saved frame (empty while the body runs)
    pub fn frame(&self) -> &GeneratorFrame {
        &self.frame
    }

    /// Iterator currently receiving `next`/`return`/`throw`
    pub fn delegate(&self) -> Option<ObjectRef> {
        self.delegate.as_ref().map(|d| d.iterator)
    }

    /// Location of the exception that completed the generator
    pub fn last_location(&self) -> Option<&SourceLocation> {
        self.last_location.as_ref()
    }

    fn complete(&mut self) {
        self.state = GeneratorState::Completed;
        self.delegate = None;
        self.continuation = None;
    }
}

/// Allocate a generator in `SuspendedStart`, inheriting
/// `%GeneratorPrototype%`
pub fn create_generator(
    realm: &mut Realm,
    continuation: impl Continuation + 'static,
    frame: GeneratorFrame,
) -> ObjectRef {
    let proto = realm.intrinsics().generator_prototype;
    let record = GeneratorRecord::new(Box::new(continuation), frame);
    realm.alloc(ObjectKind::Generator(Box::new(record)), Some(proto))
}

/// State of a generator object
pub fn generator_state(realm: &Realm, generator: ObjectRef) -> VmResult<GeneratorState> {
    match realm.object(generator).kind() {
        ObjectKind::Generator(record) => Ok(record.state),
        _ => Err(incompatible_receiver("state")),
    }
}

/// `generator.next(value)`
pub fn generator_next(realm: &mut Realm, generator: ObjectRef, value: Value) -> VmResult<IteratorResult> {
    resume(realm, generator, Completion::Next(value))
}

/// `generator.return(value)`
pub fn generator_return(realm: &mut Realm, generator: ObjectRef, value: Value) -> VmResult<IteratorResult> {
    resume(realm, generator, Completion::Return(value))
}

/// `generator.throw(value)`
pub fn generator_throw(realm: &mut Realm, generator: ObjectRef, value: Value) -> VmResult<IteratorResult> {
    resume(realm, generator, Completion::Throw(value))
}

fn incompatible_receiver(method: &str) -> VmError {
    VmError::type_error(format!("{method} method called on incompatible receiver"))
}

fn record_mut(realm: &mut Realm, generator: ObjectRef) -> VmResult<&mut GeneratorRecord> {
    match realm.object_mut(generator).kind_mut() {
        ObjectKind::Generator(record) => Ok(&mut **record),
        _ => Err(incompatible_receiver("generator")),
    }
}

enum Action {
    Resume(Completion),
    DelegateNext(Value),
    DelegateReturn(Value),
    DelegateThrow(Value),
}

enum Flow {
    Continue(Action),
    Done(IteratorResult),
}

fn resume(realm: &mut Realm, generator: ObjectRef, completion: Completion) -> VmResult<IteratorResult> {
    let record = record_mut(realm, generator)?;
    match (record.state, completion) {
        (GeneratorState::Executing, _) => Err(VmError::Reentrancy),
        (GeneratorState::Completed, Completion::Next(_)) => Ok(IteratorResult::done_undefined()),
        (GeneratorState::Completed, Completion::Return(value)) => Ok(IteratorResult::done(value)),
        (GeneratorState::Completed, Completion::Throw(value)) => {
            Err(VmError::exception_at(value, record.last_location.clone()))
        }
        (GeneratorState::SuspendedStart, Completion::Return(value)) => {
            record.complete();
            trace!(target: "ferrite::generator", generator = generator.index(), "closed before start");
            Ok(IteratorResult::done(value))
        }
        (GeneratorState::SuspendedStart, Completion::Throw(value)) => {
            record.complete();
            trace!(target: "ferrite::generator", generator = generator.index(), "thrown into before start");
            Err(VmError::exception(value))
        }
        (_, completion) => {
            let action = match (record.delegate.is_some(), completion) {
                (false, completion) => Action::Resume(completion),
                (true, Completion::Next(value)) => Action::DelegateNext(value),
                (true, Completion::Return(value)) => Action::DelegateReturn(value),
                (true, Completion::Throw(value)) => Action::DelegateThrow(value),
            };
            record.state = GeneratorState::Executing;
            run(realm, generator, action)
        }
    }
}

fn run(realm: &mut Realm, generator: ObjectRef, mut action: Action) -> VmResult<IteratorResult> {
    loop {
        let flow = match action {
            Action::Resume(completion) => resume_body(realm, generator, completion),
            Action::DelegateNext(value) => delegate_next(realm, generator, value),
            Action::DelegateReturn(value) => delegate_return(realm, generator, value),
            Action::DelegateThrow(value) => delegate_throw(realm, generator, value),
        };
        match flow {
            Ok(Flow::Continue(next)) => action = next,
            Ok(Flow::Done(result)) => {
                let record = record_mut(realm, generator)?;
                if record.state == GeneratorState::Executing {
                    record.state = if result.done {
                        GeneratorState::Completed
                    } else {
                        GeneratorState::SuspendedYield
                    };
                }
                trace!(target: "ferrite::generator", generator = generator.index(), state = ?record.state, "suspended");
                return Ok(result);
            }
            Err(err) => {
                if let Ok(record) = record_mut(realm, generator) {
                    if let VmError::Exception(thrown) = &err {
                        if thrown.location.is_some() {
                            record.last_location = thrown.location.clone();
                        }
                    }
                    record.complete();
                }
                trace!(target: "ferrite::generator", generator = generator.index(), error = %err, "completed abruptly");
                return Err(err);
            }
        }
    }
}

fn resume_body(realm: &mut Realm, generator: ObjectRef, completion: Completion) -> VmResult<Flow> {
    let record = record_mut(realm, generator)?;
    let mut continuation = record
        .continuation
        .take()
        .ok_or_else(|| VmError::internal("generator resumed without a continuation"))?;
    let mut frame = std::mem::take(&mut record.frame);

    let step = continuation.resume(realm, &mut frame, completion);

    let record = record_mut(realm, generator)?;
    record.continuation = Some(continuation);
    record.frame = frame;

    match step? {
        Step::Yield(value) => Ok(Flow::Done(IteratorResult::yielded(value))),
        Step::Return(value) => {
            record.complete();
            Ok(Flow::Done(IteratorResult::done(value)))
        }
        Step::Throw { value, location } => {
            record.complete();
            record.last_location = location.clone();
            Err(VmError::exception_at(value, location))
        }
        Step::Delegate(iterable) => match get_iterator(realm, &iterable) {
            Ok(delegate) => {
                debug!(target: "ferrite::generator", generator = generator.index(), delegate = delegate.iterator.index(), "delegating");
                record_mut(realm, generator)?.delegate = Some(delegate);
                Ok(Flow::Continue(Action::DelegateNext(Value::Undefined)))
            }
            Err(err) => recover(realm, err),
        },
    }
}

/// Route a non-fatal error back into the body as a thrown value
fn recover(realm: &mut Realm, err: VmError) -> VmResult<Flow> {
    let value = realm.error_to_value(err)?;
    Ok(Flow::Continue(Action::Resume(Completion::Throw(value))))
}

fn current_delegate(realm: &mut Realm, generator: ObjectRef) -> VmResult<IteratorRecord> {
    record_mut(realm, generator)?
        .delegate
        .clone()
        .ok_or_else(|| VmError::internal("delegation without a delegate"))
}

fn clear_delegate(realm: &mut Realm, generator: ObjectRef) -> VmResult<()> {
    let record = record_mut(realm, generator)?;
    if let Some(delegate) = record.delegate.take() {
        debug!(target: "ferrite::generator", generator = generator.index(), delegate = delegate.iterator.index(), "delegation finished");
    }
    Ok(())
}

/// `(done, value)` of an iterator result object
fn unpack(realm: &mut Realm, result: VmResult<Value>) -> VmResult<(bool, Value)> {
    let result = result?;
    let Some(result) = result.as_object() else {
        return Err(VmError::type_error(format!(
            "Iterator result {} is not an object",
            result.display_string()
        )));
    };
    let done = iterator_complete(realm, result)?;
    Ok((done, iterator_value(realm, result)?))
}

/// A delegate's answer: keep yielding its values, or resume the body
fn settle(
    realm: &mut Realm,
    generator: ObjectRef,
    outcome: VmResult<(bool, Value)>,
    on_done: fn(Value) -> Completion,
) -> VmResult<Flow> {
    match outcome {
        Ok((false, value)) => Ok(Flow::Done(IteratorResult::yielded(value))),
        Ok((true, value)) => {
            clear_delegate(realm, generator)?;
            Ok(Flow::Continue(Action::Resume(on_done(value))))
        }
        Err(err) => {
            clear_delegate(realm, generator)?;
            recover(realm, err)
        }
    }
}

fn delegate_next(realm: &mut Realm, generator: ObjectRef, value: Value) -> VmResult<Flow> {
    let delegate = current_delegate(realm, generator)?;
    let outcome = iterator_next(realm, &delegate, Some(value))
        .map(Value::Object)
        .and_then(|result| unpack(realm, Ok(result)));
    settle(realm, generator, outcome, Completion::Next)
}

fn delegate_return(realm: &mut Realm, generator: ObjectRef, value: Value) -> VmResult<Flow> {
    let delegate = current_delegate(realm, generator)?;
    let iterator = Value::Object(delegate.iterator);
    let method = match get_method(realm, &iterator, &PropertyKey::string("return")) {
        Ok(method) => method,
        Err(err) => return settle(realm, generator, Err(err), Completion::Return),
    };
    let Some(method) = method else {
        clear_delegate(realm, generator)?;
        return Ok(Flow::Continue(Action::Resume(Completion::Return(value))));
    };
    let result = realm.call(&method, &iterator, &[value]);
    let outcome = unpack(realm, result);
    settle(realm, generator, outcome, Completion::Return)
}

fn delegate_throw(realm: &mut Realm, generator: ObjectRef, value: Value) -> VmResult<Flow> {
    let delegate = current_delegate(realm, generator)?;
    let iterator = Value::Object(delegate.iterator);
    let method = match get_method(realm, &iterator, &PropertyKey::string("throw")) {
        Ok(method) => method,
        Err(err) => return settle(realm, generator, Err(err), Completion::Next),
    };
    if let Some(method) = method {
        let result = realm.call(&method, &iterator, &[value]);
        let outcome = unpack(realm, result);
        return settle(realm, generator, outcome, Completion::Next);
    }

    // No `throw`: close the delegate, then raise the original value in the body
    clear_delegate(realm, generator)?;
    match iterator_close(realm, &delegate, Ok(Value::Undefined)) {
        Ok(_) => Ok(Flow::Continue(Action::Resume(Completion::Throw(value)))),
        Err(err) => recover(realm, err),
    }
}

fn this_generator(this: &Value, method: &str) -> VmResult<ObjectRef> {
    this.as_object().ok_or_else(|| incompatible_receiver(method))
}

/// `%GeneratorPrototype%` methods
pub(crate) fn install_intrinsics(realm: &mut Realm) {
    let proto = realm.intrinsics().generator_prototype;
    let tag = realm.symbols().to_string_tag.clone();

    realm.define_method(proto, "next", "next", 1, |realm, this, args| {
        let generator = this_generator(this, "next")?;
        let result = generator_next(realm, generator, args.first().cloned().unwrap_or_default())?;
        Ok(Value::Object(result.into_object(realm)))
    });
    realm.define_method(proto, "return", "return", 1, |realm, this, args| {
        let generator = this_generator(this, "return")?;
        let result = generator_return(realm, generator, args.first().cloned().unwrap_or_default())?;
        Ok(Value::Object(result.into_object(realm)))
    });
    realm.define_method(proto, "throw", "throw", 1, |realm, this, args| {
        let generator = this_generator(this, "throw")?;
        let result = generator_throw(realm, generator, args.first().cloned().unwrap_or_default())?;
        Ok(Value::Object(result.into_object(realm)))
    });
    realm.define_builtin(proto, tag, Value::string("Generator"));
}
