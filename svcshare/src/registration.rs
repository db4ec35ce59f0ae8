use std::{any::Any, num::NonZeroUsize, sync::Arc};

use svcshare_core::{LeaseBound, ServiceParameters, SharedService};

use crate::{
    error::ParametersError,
    isolation::parameter_type_of,
    provider::{DynProvider, ServiceHandle, ServiceProvider},
    Type,
};

/// The configuration surface handed to the configure step of
/// [`register_if_absent`](crate::ServiceRegistry::register_if_absent).
///
/// Recognizes exactly two options: the parameters object and the lease
/// bound.
pub struct ServiceSpec<P: ServiceParameters> {
    name: Arc<str>,
    parameters: Option<P>,
    lease_bound: LeaseBound,
}

impl<P: ServiceParameters> ServiceSpec<P> {
    pub(crate) fn new(name: Arc<str>, parameters: Option<P>) -> Self {
        Self {
            name,
            parameters,
            lease_bound: LeaseBound::Unbounded,
        }
    }

    /// Mutable access to the parameters object the service will be
    /// constructed from.
    ///
    /// # Errors
    ///
    /// Fails with [`ParametersError::Missing`] when the service declares
    /// [`NoParameters`](crate::NoParameters).
    pub fn parameters_mut(&mut self) -> Result<&mut P, ParametersError> {
        self.parameters
            .as_mut()
            .ok_or_else(|| ParametersError::Missing(self.name.to_string()))
    }

    /// Bounds the number of concurrent holders of the service instance.
    ///
    /// Left unset, any number of concurrent holders is permitted.
    pub fn max_parallel_usages(&mut self, max: NonZeroUsize) {
        self.lease_bound = LeaseBound::Bounded(max);
    }

    pub(crate) fn into_parts(self) -> (Option<P>, LeaseBound) {
        (self.parameters, self.lease_bound)
    }
}

/// The immutable, execution-scoped record binding a registered name to a
/// service type, its isolated parameters, its lease bound and its provider.
pub struct Registration {
    name: Arc<str>,
    service_type: Type,
    parameter_type: Option<Type>,
    parameters: Option<Arc<dyn Any + Send + Sync>>,
    provider: DynProvider,
}

impl Registration {
    pub(crate) fn new<S: SharedService>(
        name: Arc<str>,
        parameters: Option<Arc<dyn Any + Send + Sync>>,
        provider: Arc<ServiceProvider<S>>,
    ) -> Self {
        Self {
            name,
            service_type: Type::of::<S>(),
            parameter_type: parameter_type_of::<S>(),
            parameters,
            provider: DynProvider::new(provider),
        }
    }

    /// The name the service was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The concrete service implementation type.
    pub fn service_type(&self) -> Type {
        self.service_type
    }

    /// The declared parameters type, or `None` when the service opted out
    /// via [`NoParameters`](crate::NoParameters).
    pub fn parameter_type(&self) -> Option<Type> {
        self.parameter_type
    }

    /// The isolated parameters snapshot the service is constructed from.
    ///
    /// # Errors
    ///
    /// Fails with [`ParametersError::Missing`] when the service declares no
    /// parameters, and with [`ParametersError::TypeMismatch`] when `P` is
    /// not the declared parameters type.
    pub fn parameters<P: ServiceParameters>(&self) -> Result<Arc<P>, ParametersError> {
        let parameters = self
            .parameters
            .as_ref()
            .ok_or_else(|| ParametersError::Missing(self.name.to_string()))?;

        Arc::clone(parameters)
            .downcast::<P>()
            .map_err(|_| ParametersError::TypeMismatch {
                name: self.name.to_string(),
                // The declared type is always present when parameters are.
                declared: self.parameter_type.unwrap_or_else(Type::of::<P>),
                requested: Type::of::<P>(),
            })
    }

    /// The configured maximum number of concurrent holders.
    pub fn max_parallel_usages(&self) -> LeaseBound {
        self.provider.lease_bound()
    }

    /// The typed handle, if `S` is the registered service type.
    pub fn handle<S: SharedService>(&self) -> Option<ServiceHandle<S>> {
        self.provider.as_handle::<S>()
    }

    pub(crate) fn provider(&self) -> &DynProvider {
        &self.provider
    }
}
