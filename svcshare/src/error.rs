use std::sync::Arc;

use thiserror::Error;

use crate::Type;

/// Errors surfaced synchronously by the registration operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An explicit [`register`](crate::ServiceRegistry::register) call used
    /// a name that is already taken.
    #[error("service '{0}' has already been registered")]
    DuplicateRegistration(String),

    /// [`register_if_absent`](crate::ServiceRegistry::register_if_absent)
    /// found an existing registration under the requested name whose service
    /// type differs from the requested one.
    #[error("service '{name}' is already registered with type `{registered}`, requested `{requested}`")]
    ServiceTypeMismatch {
        /// The contested service name.
        name: String,
        /// The type recorded by the existing registration.
        registered: Type,
        /// The type the caller asked for.
        requested: Type,
    },
}

/// Errors surfaced by [`ServiceHandle::resolve`](crate::ServiceHandle::resolve).
///
/// `Clone` so that an instantiation failure cached on the provider is
/// re-reported identically to every later resolver.
#[derive(Clone, Debug, Error)]
pub enum ResolveError {
    /// Constructing the service instance failed. The failure is cached on
    /// the provider; there is no silent retry.
    #[error("failed to create service '{name}': {reason}")]
    Instantiation {
        /// The registered service name.
        name: Arc<str>,
        /// The rendered construction error.
        reason: Arc<str>,
    },

    /// The provider was stopped before this resolution.
    #[error("service '{name}' has been stopped")]
    Stopped {
        /// The registered service name.
        name: Arc<str>,
    },
}

/// A failure of one service's shutdown routine during teardown.
///
/// Isolated per service: teardown reports these and keeps going, and the
/// provider stays stopped regardless.
#[derive(Debug, Error)]
#[error("failed to stop service '{name}': {reason}")]
pub struct StopError {
    /// The registered service name.
    pub name: String,
    /// The rendered shutdown error.
    pub reason: String,
}

/// Errors surfaced when accessing a service's parameters.
#[derive(Debug, Error)]
pub enum ParametersError {
    /// The service declares [`NoParameters`](crate::NoParameters).
    #[error("service '{0}' declares no parameters")]
    Missing(String),

    /// The requested parameters type differs from the declared one.
    #[error("service '{name}' has parameters of type `{declared}`, requested `{requested}`")]
    TypeMismatch {
        /// The contested service name.
        name: String,
        /// The parameters type declared by the service.
        declared: Type,
        /// The type the caller asked for.
        requested: Type,
    },
}
