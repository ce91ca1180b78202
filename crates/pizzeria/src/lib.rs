//! Top-level facade crate for pizzeria.
//!
//! Re-exports the core counter/scope types and the gateway library so users
//! can depend on a single crate.

pub mod core {
    pub use pizzeria_core::*;
}

pub mod gateway {
    pub use pizzeria_gateway::*;
}
