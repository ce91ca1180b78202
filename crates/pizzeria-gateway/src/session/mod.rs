//! Session scopes on the host side.
//!
//! The registry opens one scope per connection through the registered
//! factory; the per-message context hands that scope's counter to services.

mod ctx;
mod scope_registry;

pub use ctx::SessionCtx;
pub use scope_registry::{ScopeGuard, ScopeRegistry};

use pizzeria_core::{PizzaCounter, PizzaCounterFactory, SessionScope};

/// Scope carrying a pizza counter.
pub type PizzaScope = SessionScope<PizzaCounter>;
/// Registry producing pizza scopes.
pub type PizzaScopes = ScopeRegistry<PizzaCounterFactory>;
