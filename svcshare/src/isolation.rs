use std::{ops::Deref, sync::Arc};

use svcshare_core::{NoParameters, ServiceParameters, SharedService};

use crate::Type;

/// An immutable, independently owned snapshot of a parameters object.
///
/// Taken at registration time, after the configure step has run. The
/// snapshot is safe to retain beyond the original instance's lifetime and
/// cheap to share across threads.
#[derive(Debug)]
pub struct Isolated<P> {
    snapshot: Arc<P>,
}

impl<P: ServiceParameters> Isolated<P> {
    /// Takes an isolated snapshot of `parameters`.
    pub fn snapshot(parameters: &P) -> Self {
        Self {
            snapshot: Arc::new(parameters.clone()),
        }
    }

    pub(crate) fn shared(&self) -> Arc<P> {
        Arc::clone(&self.snapshot)
    }
}

impl<P> Clone for Isolated<P> {
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<P> Deref for Isolated<P> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.snapshot
    }
}

/// Resolves the parameters type declared by a service implementation.
///
/// Pure and deterministic: driven entirely by the service's
/// [`Parameters`](SharedService::Parameters) association. Yields `None` when
/// the implementation opts out via [`NoParameters`].
pub fn parameter_type_of<S: SharedService>() -> Option<Type> {
    let declared = Type::of::<S::Parameters>();
    if declared.is::<NoParameters>() {
        None
    } else {
        Some(declared)
    }
}
