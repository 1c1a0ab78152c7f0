//! # Ferrite VM Core
//!
//! Object model and suspendable execution for the Ferrite script engine.
//!
//! ## Design Principles
//!
//! - **Arena objects**: objects live in a per-realm heap and are addressed
//!   by [`ObjectRef`] handles, so prototype cycles need no special care
//! - **Capability tags**: object kinds form a closed enum queried through
//!   `is_callable` / `as_constructor` / `as_iterable`
//! - **Descriptor reconciliation**: every property definition funnels
//!   through [`property::reconcile`]
//! - **External interpreter**: generators run their bodies through the
//!   [`Continuation`] trait; this crate owns only the lifecycle
//!
//! Single-threaded: a realm and everything in it belong to one thread.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod generator;
pub mod heap;
pub mod iteration;
pub mod keyed_group;
pub mod object;
pub mod operations;
pub mod property;
pub mod realm;
pub mod value;

pub use config::{ConfigError, RealmConfig};
pub use error::{SourceLocation, ThrownValue, VmError, VmResult};
pub use generator::{
    Completion, Continuation, GeneratorFrame, GeneratorState, Step, create_generator,
    generator_next, generator_return, generator_state, generator_throw,
};
pub use iteration::{IteratorRecord, IteratorResult};
pub use keyed_group::{GroupKey, Groups, KeyCoercion, group_by};
pub use object::{ForeignObject, ObjectKind, ObjectRecord};
pub use operations::IntegrityLevel;
pub use property::{DescriptorKind, PropertyDescriptor, PropertyKey, PropertySlot};
pub use realm::Realm;
pub use value::{ObjectRef, Symbol, Value};
