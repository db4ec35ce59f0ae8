#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use svcshare::{BoxError, NoParameters, ServiceParameters, SharedService};

/// Counts constructions and shutdowns observed by one test, shared with the
/// service through its parameters.
#[derive(Clone, Debug, Default)]
pub(crate) struct Counters {
    pub(crate) created: Arc<AtomicUsize>,
    pub(crate) stopped: Arc<AtomicUsize>,
}

impl Counters {
    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub(crate) fn stopped(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct CounterParameters {
    pub(crate) label: String,
    pub(crate) create_delay: Option<Duration>,
    pub(crate) counters: Counters,
}

impl ServiceParameters for CounterParameters {}

#[derive(Debug)]
pub(crate) struct CountingService {
    pub(crate) label: String,
    counters: Counters,
}

impl SharedService for CountingService {
    type Parameters = CounterParameters;

    fn create(parameters: &CounterParameters) -> Result<Self, BoxError> {
        if let Some(delay) = parameters.create_delay {
            thread::sleep(delay);
        }
        parameters.counters.created.fetch_add(1, Ordering::SeqCst);
        Ok(CountingService {
            label: parameters.label.clone(),
            counters: parameters.counters.clone(),
        })
    }

    fn shutdown(&self) -> Result<(), BoxError> {
        self.counters.stopped.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct FlakyParameters {
    pub(crate) attempts: Arc<AtomicUsize>,
}

impl ServiceParameters for FlakyParameters {}

/// Construction always fails; the registry must cache the failure.
#[derive(Debug)]
pub(crate) struct FailingService;

impl SharedService for FailingService {
    type Parameters = FlakyParameters;

    fn create(parameters: &FlakyParameters) -> Result<Self, BoxError> {
        parameters.attempts.fetch_add(1, Ordering::SeqCst);
        Err("broken dependency".into())
    }
}

/// Declares no parameters and shuts down cleanly.
#[derive(Debug)]
pub(crate) struct PlainService;

impl SharedService for PlainService {
    type Parameters = NoParameters;

    fn create(_: &NoParameters) -> Result<Self, BoxError> {
        Ok(PlainService)
    }
}

/// Shuts down with an error; teardown must isolate it.
#[derive(Debug)]
pub(crate) struct StubbornService;

impl SharedService for StubbornService {
    type Parameters = NoParameters;

    fn create(_: &NoParameters) -> Result<Self, BoxError> {
        Ok(StubbornService)
    }

    fn shutdown(&self) -> Result<(), BoxError> {
        Err("flush failed".into())
    }
}
