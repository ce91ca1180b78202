//! Pizzeria core: the session-scoped pizza counter, the scope/factory
//! contract a host uses to create one counter per session, the text wire
//! envelope, and the shared error type.
//!
//! This crate carries no transport or runtime dependencies so the counter and
//! its scope contract can be embedded in any host.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `PizzeriaError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod counter;
pub mod error;
pub mod protocol;
pub mod scope;

pub use counter::{PizzaCounter, PizzaCounterFactory};
/// Shared result type.
pub use error::{PizzeriaError, Result};
pub use scope::{ScopeFactory, ScopeId, SessionScope};
