use std::sync::Arc;

use axum::extract::ws::Message;
use serde_json::Value;
use tokio::sync::mpsc::{self, error::TrySendError};

use pizzeria_core::error::{PizzeriaError, Result};
use pizzeria_core::{PizzaCounter, ScopeId};

use crate::obs::GatewayMetrics;
use crate::session::PizzaScope;

/// Per-message context passed to services.
///
/// Carries the session's scope explicitly; services never look the counter up
/// from shared state.
#[derive(Clone)]
pub struct SessionCtx {
    scope: Arc<PizzaScope>,
    tx: mpsc::Sender<Message>,
    metrics: Arc<GatewayMetrics>,
}

impl SessionCtx {
    pub fn new(
        scope: Arc<PizzaScope>,
        tx: mpsc::Sender<Message>,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self { scope, tx, metrics }
    }

    pub fn scope_id(&self) -> ScopeId {
        self.scope.id()
    }

    pub fn counter(&self) -> &PizzaCounter {
        self.scope.service()
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    /// Queue a JSON reply to this session. Never waits: the session loop that
    /// drains the queue is the one running the service.
    pub fn reply_json(&self, v: Value) -> Result<()> {
        self.tx.try_send(Message::Text(v.to_string())).map_err(|e| match e {
            TrySendError::Full(_) => PizzeriaError::Internal("outbound queue full".into()),
            TrySendError::Closed(_) => PizzeriaError::Internal("outbound channel closed".into()),
        })
    }
}
