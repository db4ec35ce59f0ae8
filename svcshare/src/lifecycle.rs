use parking_lot::Mutex;

type FinishListener = Box<dyn FnOnce() + Send>;

enum Listeners {
    Pending(Vec<FinishListener>),
    Fired,
}

/// The execution-lifecycle event source.
///
/// Exposes a single "execution finished" event that fires exactly once per
/// execution. [`ServiceRegistry::new`](crate::ServiceRegistry::new)
/// subscribes its teardown hook here; the authority driving the execution
/// calls [`execution_finished`](ExecutionEvents::execution_finished) after
/// all consumers have had the chance to resolve the services they need.
pub struct ExecutionEvents {
    listeners: Mutex<Listeners>,
}

impl Default for ExecutionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionEvents {
    /// Creates an event source that has not fired yet.
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Listeners::Pending(Vec::new())),
        }
    }

    /// Subscribes `listener` to the execution-finished event.
    ///
    /// If the event has already fired, `listener` runs on the calling
    /// thread before this method returns.
    pub fn on_execution_finished(&self, listener: impl FnOnce() + Send + 'static) {
        let mut listeners = self.listeners.lock();
        match &mut *listeners {
            Listeners::Pending(pending) => pending.push(Box::new(listener)),
            Listeners::Fired => {
                drop(listeners);
                listener();
            }
        }
    }

    /// Fires the execution-finished event.
    ///
    /// Listeners run on the calling thread, in subscription order, with the
    /// subscription lock released so they may subscribe or touch registries
    /// freely. Only the first call fires; later calls are no-ops.
    pub fn execution_finished(&self) {
        let pending = {
            let mut listeners = self.listeners.lock();
            match std::mem::replace(&mut *listeners, Listeners::Fired) {
                Listeners::Pending(pending) => pending,
                Listeners::Fired => return,
            }
        };

        tracing::debug!(listeners = pending.len(), "execution finished");
        for listener in pending {
            listener();
        }
    }
}
