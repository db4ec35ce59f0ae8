//! Core capability types shared between service implementations and the
//! registry that hosts them.

use std::{any::Any, error::Error, fmt, num::NonZeroUsize};

/// A boxed error returned by service construction and shutdown routines.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Marker trait for a service's parameters object.
///
/// 1. a fresh instance is created by the registry before the configure step runs.
/// 2. the instance is snapshotted at registration time, so [`Clone`] must
///    produce an independently owned copy.
pub trait ServiceParameters: Any + Clone + Default + Send + Sync {}

/// The designated "no parameters" marker.
///
/// A service whose [`Parameters`](SharedService::Parameters) is `NoParameters`
/// declares that it takes no configuration. Querying parameters on such a
/// service's spec or registration fails instead of yielding a placeholder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoParameters;

impl ServiceParameters for NoParameters {}

/// A named, stateful object shared by concurrent units of work within one
/// execution.
///
/// At most one instance exists per registered name for the lifetime of the
/// execution. The instance is created lazily on first resolution and stopped
/// exactly once when the execution finishes.
pub trait SharedService: Send + Sync + Sized + 'static {
    /// The parameters the service is constructed from, or [`NoParameters`].
    type Parameters: ServiceParameters;

    /// Constructs the service instance from its isolated parameters.
    ///
    /// Runs at most once per registration, on the first thread to resolve
    /// the service's handle.
    fn create(parameters: &Self::Parameters) -> Result<Self, BoxError>;

    /// Releases resources held by the instance.
    ///
    /// Runs at most once, at the end of the execution, and only if the
    /// instance was actually created. The default does nothing.
    fn shutdown(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// The maximum number of concurrent holders permitted for a service instance.
///
/// Advisory metadata: the registry stores and reports it, the scheduler that
/// hands the service out is responsible for enforcing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeaseBound {
    /// Any number of concurrent holders.
    Unbounded,
    /// At most this many concurrent holders.
    Bounded(NonZeroUsize),
}

impl LeaseBound {
    /// Returns the bound as a number, or `None` when unbounded.
    pub fn limit(self) -> Option<NonZeroUsize> {
        match self {
            LeaseBound::Unbounded => None,
            LeaseBound::Bounded(max) => Some(max),
        }
    }

    /// Returns whether any number of concurrent holders is permitted.
    pub fn is_unbounded(self) -> bool {
        matches!(self, LeaseBound::Unbounded)
    }
}

impl fmt::Display for LeaseBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaseBound::Unbounded => f.write_str("unbounded"),
            LeaseBound::Bounded(max) => write!(f, "{max}"),
        }
    }
}
