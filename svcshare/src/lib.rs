//! Svcshare - a shared-service registry for concurrent units of work.
//!
//! Independent workers (tasks in a build, jobs in a worker pool) obtain
//! handles to named, lazily created, possibly stateful service objects. The
//! registry guarantees that at most one logical instance exists per
//! registered name within one execution, reports the configured bound on
//! concurrent holders of each instance, and stops every instantiated
//! service exactly once when the execution finishes.
//!
//! Registration is cheap and synchronous; instantiation is deferred to the
//! first [`resolve`](ServiceHandle::resolve) and happens exactly once even
//! under concurrent resolution. The lease bound is advisory: the scheduler
//! handing out the service is responsible for admitting at most that many
//! concurrent holders.
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroUsize;
//!
//! use svcshare::{BoxError, ExecutionEvents, ServiceParameters, ServiceRegistry, SharedService};
//!
//! #[derive(Clone, Default)]
//! struct CacheParameters {
//!     capacity: usize,
//! }
//!
//! impl ServiceParameters for CacheParameters {}
//!
//! struct Cache {
//!     capacity: usize,
//! }
//!
//! impl SharedService for Cache {
//!     type Parameters = CacheParameters;
//!
//!     fn create(parameters: &CacheParameters) -> Result<Self, BoxError> {
//!         Ok(Cache {
//!             capacity: parameters.capacity,
//!         })
//!     }
//! }
//!
//! let events = ExecutionEvents::new();
//! let registry = ServiceRegistry::new(&events);
//!
//! let handle = registry
//!     .register_if_absent::<Cache, _>("cache", |spec| {
//!         spec.parameters_mut().unwrap().capacity = 512;
//!         spec.max_parallel_usages(NonZeroUsize::new(4).unwrap());
//!     })
//!     .unwrap();
//!
//! let cache = handle.resolve().unwrap();
//! assert_eq!(cache.capacity, 512);
//!
//! // End of the execution: every instantiated service is stopped.
//! events.execution_finished();
//! ```

mod error;
mod isolation;
mod lifecycle;
mod provider;
mod registration;
mod registry;
mod ty;

pub use error::*;
pub use isolation::*;
pub use lifecycle::*;
pub use provider::*;
pub use registration::*;
pub use registry::*;
pub use svcshare_core::*;
pub use ty::*;
