use std::{any::Any, fmt, sync::Arc};

use parking_lot::{Condvar, Mutex};
use svcshare_core::{LeaseBound, SharedService};

use crate::{
    error::{ResolveError, StopError},
    isolation::Isolated,
};

enum ProviderState<S> {
    Unresolved,
    Instantiating,
    Resolved(Arc<S>),
    Failed(ResolveError),
    Stopped,
}

/// The lazy, memoized factory for one service instance.
///
/// State moves `Unresolved -> Instantiating -> Resolved | Failed`, and from
/// `Unresolved` or `Resolved` to the terminal `Stopped`. A `Failed` provider
/// stays `Failed` so the cached error keeps being re-reported. First
/// resolution and stop are serialized against each other; each provider
/// synchronizes independently, so unrelated services never contend.
pub(crate) struct ServiceProvider<S: SharedService> {
    name: Arc<str>,
    lease_bound: LeaseBound,
    parameters: Isolated<S::Parameters>,
    state: Mutex<ProviderState<S>>,
    state_changed: Condvar,
}

impl<S: SharedService> ServiceProvider<S> {
    pub(crate) fn new(
        name: Arc<str>,
        lease_bound: LeaseBound,
        parameters: Isolated<S::Parameters>,
    ) -> Self {
        Self {
            name,
            lease_bound,
            parameters,
            state: Mutex::new(ProviderState::Unresolved),
            state_changed: Condvar::new(),
        }
    }

    pub(crate) fn name(&self) -> &Arc<str> {
        &self.name
    }

    pub(crate) fn lease_bound(&self) -> LeaseBound {
        self.lease_bound
    }

    pub(crate) fn resolve(&self) -> Result<Arc<S>, ResolveError> {
        let mut state = self.state.lock();
        loop {
            match &*state {
                ProviderState::Unresolved => break,
                ProviderState::Instantiating => self.state_changed.wait(&mut state),
                ProviderState::Resolved(instance) => return Ok(Arc::clone(instance)),
                ProviderState::Failed(error) => return Err(error.clone()),
                ProviderState::Stopped => {
                    return Err(ResolveError::Stopped {
                        name: Arc::clone(&self.name),
                    })
                }
            }
        }

        // This thread won the race to instantiate. The lock is released
        // while the constructor runs so unrelated resolutions make progress;
        // other resolvers and stop() wait on `state_changed` until the
        // outcome is published.
        *state = ProviderState::Instantiating;
        drop(state);

        tracing::debug!(service = %self.name, "creating service instance");
        let outcome = S::create(&self.parameters);

        let mut state = self.state.lock();
        let result = match outcome {
            Ok(instance) => {
                let instance = Arc::new(instance);
                *state = ProviderState::Resolved(Arc::clone(&instance));
                Ok(instance)
            }
            Err(error) => {
                let error = ResolveError::Instantiation {
                    name: Arc::clone(&self.name),
                    reason: error.to_string().into(),
                };
                tracing::warn!(service = %self.name, %error, "service instantiation failed");
                *state = ProviderState::Failed(error.clone());
                Err(error)
            }
        };
        drop(state);
        self.state_changed.notify_all();
        result
    }

    pub(crate) fn stop(&self) -> Result<(), StopError> {
        let mut state = self.state.lock();
        while matches!(&*state, ProviderState::Instantiating) {
            self.state_changed.wait(&mut state);
        }
        let instance = match std::mem::replace(&mut *state, ProviderState::Stopped) {
            ProviderState::Resolved(instance) => instance,
            ProviderState::Failed(error) => {
                // Keep the cached failure observable for later resolvers.
                *state = ProviderState::Failed(error);
                return Ok(());
            }
            // Unresolved or already stopped: nothing to shut down.
            _ => return Ok(()),
        };
        drop(state);

        tracing::debug!(service = %self.name, "stopping service instance");
        instance.shutdown().map_err(|error| StopError {
            name: self.name.to_string(),
            reason: error.to_string(),
        })
    }
}

pub(crate) trait Stoppable: Send + Sync {
    fn stop(&self) -> Result<(), StopError>;
    fn lease_bound(&self) -> LeaseBound;
}

impl<S: SharedService> Stoppable for ServiceProvider<S> {
    fn stop(&self) -> Result<(), StopError> {
        ServiceProvider::stop(self)
    }

    fn lease_bound(&self) -> LeaseBound {
        ServiceProvider::lease_bound(self)
    }
}

/// A [`ServiceProvider`] that erased its service type, as stored in a
/// [`Registration`](crate::Registration).
pub(crate) struct DynProvider {
    stoppable: Arc<dyn Stoppable>,
    origin: Arc<dyn Any + Send + Sync>,
}

impl DynProvider {
    pub(crate) fn new<S: SharedService>(provider: Arc<ServiceProvider<S>>) -> Self {
        Self {
            stoppable: Arc::clone(&provider) as Arc<dyn Stoppable>,
            origin: provider,
        }
    }

    pub(crate) fn stop(&self) -> Result<(), StopError> {
        self.stoppable.stop()
    }

    pub(crate) fn lease_bound(&self) -> LeaseBound {
        self.stoppable.lease_bound()
    }

    /// Recovers the typed handle, if `S` is the registered service type.
    pub(crate) fn as_handle<S: SharedService>(&self) -> Option<ServiceHandle<S>> {
        Arc::clone(&self.origin)
            .downcast::<ServiceProvider<S>>()
            .ok()
            .map(ServiceHandle::new)
    }
}

/// The lazy handle through which consumers obtain a service instance.
///
/// Cheap to clone; every clone refers to the same underlying provider, so
/// all of them observe the same instance, the same cached failure and the
/// same stopped state.
pub struct ServiceHandle<S: SharedService> {
    provider: Arc<ServiceProvider<S>>,
}

impl<S: SharedService> Clone for ServiceHandle<S> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<S: SharedService> fmt::Debug for ServiceHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("service", &self.provider.name())
            .finish()
    }
}

impl<S: SharedService> ServiceHandle<S> {
    pub(crate) fn new(provider: Arc<ServiceProvider<S>>) -> Self {
        Self { provider }
    }

    /// The name the service was registered under.
    pub fn name(&self) -> &str {
        self.provider.name()
    }

    /// Returns the shared service instance, creating it on first use.
    ///
    /// Thread-safe and memoized: concurrent callers coordinate so the
    /// construction routine runs exactly once, and all of them observe the
    /// same instance or the same cached failure. This is the only
    /// intentionally blocking, potentially slow operation of the registry.
    pub fn resolve(&self) -> Result<Arc<S>, ResolveError> {
        self.provider.resolve()
    }

    /// The configured maximum number of concurrent holders.
    pub fn lease_bound(&self) -> LeaseBound {
        self.provider.lease_bound()
    }
}
