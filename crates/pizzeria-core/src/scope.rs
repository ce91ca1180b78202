//! Session scope contract.
//!
//! A host registers a [`ScopeFactory`] and opens one [`SessionScope`] per
//! logical session. The scope calls the factory exactly once and hands the
//! resulting service to every handler running inside it. Dropping the last
//! handle to the scope drops the service.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Builds the per-scope service instance.
pub trait ScopeFactory: Send + Sync {
    type Service: Send + Sync + 'static;

    /// Every call must return a fresh, independent instance.
    fn create(&self) -> Self::Service;
}

impl<S, F> ScopeFactory for F
where
    F: Fn() -> S + Send + Sync,
    S: Send + Sync + 'static,
{
    type Service = S;

    fn create(&self) -> S {
        self()
    }
}

/// Per-process scope identifier, displayed as `scope-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope-{}", self.0)
    }
}

/// One session scope and the service instance it owns.
#[derive(Debug)]
pub struct SessionScope<S> {
    id: ScopeId,
    opened_at: Instant,
    service: Arc<S>,
}

impl<S: Send + Sync + 'static> SessionScope<S> {
    /// Open a scope, invoking `factory` once.
    pub fn open<F>(id: ScopeId, factory: &F) -> Self
    where
        F: ScopeFactory<Service = S> + ?Sized,
    {
        Self {
            id,
            opened_at: Instant::now(),
            service: Arc::new(factory.create()),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }

    /// Borrow the scope's service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Shared handle for handlers that outlive a borrow (spawned tasks).
    pub fn handle(&self) -> Arc<S> {
        Arc::clone(&self.service)
    }
}
