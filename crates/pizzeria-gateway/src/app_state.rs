//! Shared application state for the pizzeria gateway.
//!
//! Owns the config, the scope registry (with the pizza counter factory
//! registered), the dispatcher with built-in services, and metrics.

use std::sync::Arc;

use pizzeria_core::PizzaCounterFactory;

use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::obs::GatewayMetrics;
use crate::services::PizzaService;
use crate::session::PizzaScopes;

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<GatewayConfig>,
    scopes: Arc<PizzaScopes>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<GatewayMetrics>,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        let scopes = PizzaScopes::new(PizzaCounterFactory, cfg.sessions.max_active);

        let dispatcher = Dispatcher::new();
        dispatcher.register_text(Arc::new(PizzaService::new()));
        tracing::debug!(svcs = ?dispatcher.registered_text_svcs(), "text services registered");

        Self {
            cfg: Arc::new(cfg),
            scopes: Arc::new(scopes),
            dispatcher: Arc::new(dispatcher),
            metrics: Arc::new(GatewayMetrics::default()),
        }
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.cfg
    }

    pub fn scopes(&self) -> &Arc<PizzaScopes> {
        &self.scopes
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }
}
