//! Host-side scope lifecycle: isolation, close, guard drop, capacity.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use pizzeria_core::{PizzaCounterFactory, ScopeId};
use pizzeria_gateway::session::PizzaScopes;

#[test]
fn scopes_get_distinct_counters() {
    let reg = PizzaScopes::new(PizzaCounterFactory, 8);
    let a = reg.open().unwrap();
    let b = reg.open().unwrap();
    assert_ne!(a.id(), b.id());

    for _ in 0..3 {
        a.service().increment();
    }
    assert_eq!(a.service().current_value(), 3);
    assert_eq!(b.service().current_value(), 0);

    let a_again = reg.get(a.id()).unwrap();
    assert_eq!(a_again.service().current_value(), 3);
}

#[test]
fn ids_are_sequential_from_one() {
    let reg = PizzaScopes::new(PizzaCounterFactory, 8);
    assert_eq!(reg.open().unwrap().id(), ScopeId::new(1));
    assert_eq!(reg.open().unwrap().id(), ScopeId::new(2));
}

#[test]
fn close_removes_scope() {
    let reg = PizzaScopes::new(PizzaCounterFactory, 8);
    let s = reg.open().unwrap();
    let id = s.id();
    assert_eq!(reg.active_count(), 1);

    assert!(reg.close(id).is_some());
    assert!(reg.get(id).is_none());
    assert_eq!(reg.active_count(), 0);

    // second close is a no-op
    assert!(reg.close(id).is_none());
    assert_eq!(reg.active_count(), 0);
}

#[test]
fn reopened_scope_starts_from_zero() {
    let reg = PizzaScopes::new(PizzaCounterFactory, 8);
    let s = reg.open().unwrap();
    s.service().increment();
    reg.close(s.id());

    let fresh = reg.open().unwrap();
    assert_eq!(fresh.service().current_value(), 0);
}

#[test]
fn dropping_guard_closes_scope() {
    let reg = Arc::new(PizzaScopes::new(PizzaCounterFactory, 8));
    let guard = reg.open_guarded().unwrap();
    let id = guard.id();
    guard.scope().service().increment();
    assert!(reg.get(id).is_some());

    drop(guard);
    assert!(reg.get(id).is_none());
    assert_eq!(reg.active_count(), 0);
}

#[test]
fn capacity_is_enforced() {
    let reg = PizzaScopes::new(PizzaCounterFactory, 2);
    let a = reg.open().unwrap();
    let _b = reg.open().unwrap();

    let err = reg.open().expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "SESSION_LIMIT");
    assert_eq!(reg.active_count(), 2);

    reg.close(a.id());
    assert!(reg.open().is_ok());
}

#[test]
fn concurrent_opens_never_overshoot() {
    let reg = Arc::new(PizzaScopes::new(PizzaCounterFactory, 10));
    let handles: Vec<_> = (0..32)
        .map(|_| {
            let reg = Arc::clone(&reg);
            thread::spawn(move || reg.open().is_ok())
        })
        .collect();
    let opened = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
    assert_eq!(opened, 10);
    assert_eq!(reg.active_count(), 10);
}

#[test]
fn concurrent_sells_in_one_scope_are_not_lost() {
    let reg = PizzaScopes::new(PizzaCounterFactory, 1);
    let scope = reg.open().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let counter = scope.handle();
            thread::spawn(move || {
                for _ in 0..2500 {
                    counter.increment();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(scope.service().current_value(), 10_000);
}
