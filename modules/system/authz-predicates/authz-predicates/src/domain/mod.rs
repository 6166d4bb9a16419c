//! Domain layer for authorization predicates.

pub mod access_controller;
pub mod capabilities;
pub mod collection;
mod coverage;
pub mod descriptor;
pub mod filter;
mod resolution;
pub mod single;
pub mod target;

pub use access_controller::{
    AccessController, ArgumentGuard, Guarded, GuardedArgument, GuardedCollection, MethodSpec,
};
pub use capabilities::CapabilityMap;
pub use collection::CollectionPredicate;
pub use descriptor::{MissingTargetPolicy, PredicateDescriptor};
pub use filter::{AccessFilter, Partition};
pub use single::SinglePredicate;
pub use target::{Lookup, ScopeTarget, TargetShape};
