use std::{
    any::Any,
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use svcshare_core::{LeaseBound, SharedService};

use crate::{
    error::{RegistryError, StopError},
    isolation::{parameter_type_of, Isolated},
    lifecycle::ExecutionEvents,
    provider::{ServiceHandle, ServiceProvider},
    registration::{Registration, ServiceSpec},
    Type,
};

type Registrations = HashMap<Arc<str>, Arc<Registration>>;

/// The execution-scoped, name-keyed store of service registrations.
///
/// All mutation goes through the atomic insert-if-absent path guarded by a
/// single insertion lock; each provider then synchronizes its own state
/// independently, so registering or resolving one service never serializes
/// against instantiation of another.
pub struct ServiceRegistry {
    registrations: Mutex<Registrations>,
    torn_down: AtomicBool,
}

impl ServiceRegistry {
    /// Creates a registry subscribed to `events`.
    ///
    /// When the execution-finished event fires, every service instance that
    /// was actually created is stopped, exactly once each.
    pub fn new(events: &ExecutionEvents) -> Arc<ServiceRegistry> {
        let registry = Arc::new(ServiceRegistry {
            registrations: Mutex::new(HashMap::new()),
            torn_down: AtomicBool::new(false),
        });

        let hook = Arc::downgrade(&registry);
        events.on_execution_finished(move || {
            if let Some(registry) = hook.upgrade() {
                registry.stop_all();
            }
        });

        registry
    }

    /// Registers a service under `name` unless one is already registered,
    /// returning the new or the existing handle.
    ///
    /// For a fresh registration, a parameters object is created (unless the
    /// service declares [`NoParameters`](crate::NoParameters)) and
    /// `configure` runs exactly once, synchronously, against a
    /// [`ServiceSpec`] exposing the parameters and the lease-bound setting.
    /// When the name is already taken, `configure` is not invoked and the
    /// existing handle is returned as-is; its parameters and lease bound are
    /// not re-verified against this request.
    ///
    /// The existence check and the insertion are atomic: racing calls with
    /// the same name produce exactly one registration, and the losers
    /// receive the winner's handle. `configure` runs while the insertion
    /// lock is held and must not call back into the registry. Registration
    /// never instantiates the service; that happens on the first
    /// [`resolve`](ServiceHandle::resolve).
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::ServiceTypeMismatch`] when the existing
    /// registration's service type differs from `S`.
    pub fn register_if_absent<S, F>(
        &self,
        name: &str,
        configure: F,
    ) -> Result<ServiceHandle<S>, RegistryError>
    where
        S: SharedService,
        F: FnOnce(&mut ServiceSpec<S::Parameters>),
    {
        let mut registrations = self.registrations.lock();

        if let Some(existing) = registrations.get(name) {
            return existing
                .handle::<S>()
                .ok_or_else(|| RegistryError::ServiceTypeMismatch {
                    name: name.to_string(),
                    registered: existing.service_type(),
                    requested: Type::of::<S>(),
                });
        }

        let name: Arc<str> = Arc::from(name);
        let parameters = parameter_type_of::<S>().map(|_| S::Parameters::default());
        let mut spec = ServiceSpec::new(Arc::clone(&name), parameters);
        configure(&mut spec);
        let (parameters, lease_bound) = spec.into_parts();

        Ok(insert::<S>(&mut registrations, name, parameters, lease_bound))
    }

    /// Registers a service under `name` with fully formed parameters,
    /// skipping the configure step. The lease bound is left unbounded.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::DuplicateRegistration`] when `name` is
    /// already taken; the existing registration is unaffected.
    pub fn register<S>(
        &self,
        name: &str,
        parameters: S::Parameters,
    ) -> Result<ServiceHandle<S>, RegistryError>
    where
        S: SharedService,
    {
        let mut registrations = self.registrations.lock();

        if registrations.contains_key(name) {
            return Err(RegistryError::DuplicateRegistration(name.to_string()));
        }

        let parameters = parameter_type_of::<S>().map(|_| parameters);
        Ok(insert::<S>(
            &mut registrations,
            Arc::from(name),
            parameters,
            LeaseBound::Unbounded,
        ))
    }

    /// Looks up the registration for `name`.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<Registration>> {
        self.registrations.lock().get(name).cloned()
    }

    /// A snapshot of all current registrations, in no particular order.
    pub fn registrations(&self) -> Vec<Arc<Registration>> {
        self.registrations.lock().values().cloned().collect()
    }

    /// Stops every service instance that was actually created.
    ///
    /// Runs at most once per registry; the execution-finished hook and any
    /// explicit caller share the same guard, so later calls are no-ops. A
    /// failing shutdown routine is reported in the returned list and does
    /// not prevent the remaining services from stopping.
    pub fn stop_all(&self) -> Vec<StopError> {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return Vec::new();
        }

        // Operate on the live set: registrations added after the hook was
        // subscribed are torn down too.
        let registrations = self.registrations();
        let mut failures = Vec::new();
        for registration in registrations {
            if let Err(error) = registration.provider().stop() {
                tracing::warn!(service = registration.name(), %error, "service failed to stop");
                failures.push(error);
            }
        }
        failures
    }
}

fn insert<S: SharedService>(
    registrations: &mut Registrations,
    name: Arc<str>,
    parameters: Option<S::Parameters>,
    lease_bound: LeaseBound,
) -> ServiceHandle<S> {
    let (isolated, erased) = match parameters {
        Some(parameters) => {
            let isolated = Isolated::snapshot(&parameters);
            let erased = isolated.shared() as Arc<dyn Any + Send + Sync>;
            (isolated, Some(erased))
        }
        None => (Isolated::snapshot(&S::Parameters::default()), None),
    };

    let provider = Arc::new(ServiceProvider::<S>::new(
        Arc::clone(&name),
        lease_bound,
        isolated,
    ));
    let registration = Arc::new(Registration::new::<S>(
        Arc::clone(&name),
        erased,
        Arc::clone(&provider),
    ));

    tracing::debug!(
        service = %name,
        service_type = %registration.service_type(),
        lease_bound = %lease_bound,
        "registered shared service"
    );

    registrations.insert(name, registration);
    ServiceHandle::new(provider)
}
