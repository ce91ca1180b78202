use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use pizzeria_core::error::{PizzeriaError, Result};
use pizzeria_core::{ScopeFactory, ScopeId, SessionScope};

/// Scope registry: `scope_id -> SessionScope`, bounded by `max_active`.
pub struct ScopeRegistry<F: ScopeFactory> {
    factory: F,
    scopes: DashMap<ScopeId, Arc<SessionScope<F::Service>>>,
    seq: AtomicU64,
    active: AtomicUsize,
    max_active: usize,
}

impl<F: ScopeFactory> ScopeRegistry<F> {
    pub fn new(factory: F, max_active: usize) -> Self {
        Self {
            factory,
            scopes: DashMap::new(),
            seq: AtomicU64::new(1),
            active: AtomicUsize::new(0),
            max_active,
        }
    }

    /// Open a new scope, creating its service through the factory.
    pub fn open(&self) -> Result<Arc<SessionScope<F::Service>>> {
        // reserve a slot first so concurrent opens cannot overshoot max_active
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_active).then_some(n + 1)
            })
            .map_err(|n| {
                tracing::warn!(active = n, max = self.max_active, "scope capacity exceeded");
                PizzeriaError::CapacityExceeded
            })?;

        let id = ScopeId::new(self.seq.fetch_add(1, Ordering::Relaxed));
        let scope = Arc::new(SessionScope::open(id, &self.factory));
        self.scopes.insert(id, Arc::clone(&scope));
        tracing::debug!(scope = %id, "scope opened");
        Ok(scope)
    }

    /// Open a scope whose lifetime is bound to the returned guard.
    pub fn open_guarded(self: &Arc<Self>) -> Result<ScopeGuard<F>> {
        let scope = self.open()?;
        Ok(ScopeGuard {
            registry: Arc::clone(self),
            scope,
        })
    }

    pub fn get(&self, id: ScopeId) -> Option<Arc<SessionScope<F::Service>>> {
        self.scopes.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Remove a scope. Unknown or already-closed ids are a no-op.
    pub fn close(&self, id: ScopeId) -> Option<Arc<SessionScope<F::Service>>> {
        let (_, scope) = self.scopes.remove(&id)?;
        self.active.fetch_sub(1, Ordering::AcqRel);
        tracing::debug!(
            scope = %id,
            lived_ms = scope.opened_at().elapsed().as_millis() as u64,
            "scope closed"
        );
        Some(scope)
    }

    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    pub fn max_active(&self) -> usize {
        self.max_active
    }
}

/// Closes its scope when dropped.
pub struct ScopeGuard<F: ScopeFactory> {
    registry: Arc<ScopeRegistry<F>>,
    scope: Arc<SessionScope<F::Service>>,
}

impl<F: ScopeFactory> ScopeGuard<F> {
    pub fn id(&self) -> ScopeId {
        self.scope.id()
    }

    pub fn scope(&self) -> Arc<SessionScope<F::Service>> {
        Arc::clone(&self.scope)
    }
}

impl<F: ScopeFactory> Drop for ScopeGuard<F> {
    fn drop(&mut self) {
        self.registry.close(self.scope.id());
    }
}
