//! Pizzeria gateway library entry.
//!
//! The session host: one WebSocket connection is one session scope with its
//! own pizza counter. This crate wires config, the scope registry, the
//! dispatcher, the pizza service, transport, and metrics. It is consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod router;
pub mod services;
pub mod session;
pub mod transport;
