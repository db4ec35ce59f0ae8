mod components;

use std::{
    sync::{Arc, Barrier},
    thread,
};

use svcshare::{ExecutionEvents, RegistryError, ServiceRegistry, Type};

use crate::components::{CounterParameters, CountingService, PlainService, StubbornService};

#[test]
fn register_if_absent_returns_existing_handle() {
    let events = ExecutionEvents::new();
    let registry = ServiceRegistry::new(&events);

    let first = registry
        .register_if_absent::<CountingService, _>("cache", |spec| {
            spec.parameters_mut().unwrap().label = "first".to_string();
        })
        .unwrap();

    let mut second_configured = false;
    let second = registry
        .register_if_absent::<CountingService, _>("cache", |_| {
            second_configured = true;
        })
        .unwrap();

    assert!(!second_configured);
    assert_eq!(registry.registrations().len(), 1);

    let a = first.resolve().unwrap();
    let b = second.resolve().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.label, "first");
}

#[test]
fn racing_register_if_absent_creates_one_registration() {
    let events = ExecutionEvents::new();
    let registry = ServiceRegistry::new(&events);
    let barrier = Barrier::new(8);

    let instances: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    registry
                        .register_if_absent::<PlainService, _>("shared", |_| {})
                        .unwrap()
                        .resolve()
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(registry.registrations().len(), 1);
    for instance in &instances[1..] {
        assert!(Arc::ptr_eq(&instances[0], instance));
    }
}

#[test]
fn register_duplicate_name_fails_and_preserves_first() {
    let events = ExecutionEvents::new();
    let registry = ServiceRegistry::new(&events);

    let parameters = CounterParameters {
        label: "original".to_string(),
        ..Default::default()
    };
    registry
        .register::<CountingService>("x", parameters)
        .unwrap();

    let error = registry
        .register::<StubbornService>("x", Default::default())
        .unwrap_err();
    assert!(matches!(
        error,
        RegistryError::DuplicateRegistration(ref name) if name == "x"
    ));

    let registration = registry.find_by_name("x").unwrap();
    assert!(registration.service_type().is::<CountingService>());
    assert_eq!(
        registration
            .parameters::<CounterParameters>()
            .unwrap()
            .label,
        "original"
    );
}

#[test]
fn register_if_absent_with_other_type_fails() {
    let events = ExecutionEvents::new();
    let registry = ServiceRegistry::new(&events);

    registry
        .register_if_absent::<CountingService, _>("cache", |_| {})
        .unwrap();

    let error = registry
        .register_if_absent::<PlainService, _>("cache", |_| {})
        .unwrap_err();
    match error {
        RegistryError::ServiceTypeMismatch {
            name,
            registered,
            requested,
        } => {
            assert_eq!(name, "cache");
            assert_eq!(registered, Type::of::<CountingService>());
            assert_eq!(requested, Type::of::<PlainService>());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn find_by_name_reports_absence() {
    let events = ExecutionEvents::new();
    let registry = ServiceRegistry::new(&events);

    assert!(registry.find_by_name("nope").is_none());
}

#[test]
fn registration_records_metadata() {
    let events = ExecutionEvents::new();
    let registry = ServiceRegistry::new(&events);

    registry
        .register_if_absent::<CountingService, _>("cache", |_| {})
        .unwrap();
    registry
        .register_if_absent::<PlainService, _>("plain", |_| {})
        .unwrap();

    let cache = registry.find_by_name("cache").unwrap();
    assert_eq!(cache.name(), "cache");
    assert!(cache.parameter_type().unwrap().is::<CounterParameters>());

    let plain = registry.find_by_name("plain").unwrap();
    assert!(plain.parameter_type().is_none());
    assert!(plain.handle::<PlainService>().is_some());
    assert!(plain.handle::<CountingService>().is_none());

    let names: Vec<_> = registry
        .registrations()
        .iter()
        .map(|r| r.name().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"cache".to_string()));
    assert!(names.contains(&"plain".to_string()));
}
