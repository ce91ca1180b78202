//! `pizza` service: sell a pizza or read today's count for the caller's scope.

use async_trait::async_trait;
use serde_json::{json, Value};

use pizzeria_core::error::{PizzeriaError, Result};
use pizzeria_core::protocol::text::Envelope;

use crate::dispatch::TextService;
use crate::session::SessionCtx;

pub const SVC: &str = "pizza";

#[derive(Default)]
pub struct PizzaService;

impl PizzaService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextService for PizzaService {
    fn svc(&self) -> &'static str {
        SVC
    }

    async fn handle(&self, ctx: SessionCtx, env: Envelope) -> Result<()> {
        match env.msg_type.as_str() {
            "sell" => {
                let sold = ctx.counter().increment();
                ctx.metrics().pizzas_sold.inc(&[]);
                tracing::debug!(scope = %ctx.scope_id(), sold_today = sold, "pizza sold");
                ctx.reply_json(count_json("sold", env.seq, sold))
            }
            "get" => ctx.reply_json(count_json("count", env.seq, ctx.counter().current_value())),
            other => Err(PizzeriaError::BadRequest(format!("unknown pizza type: {other}"))),
        }
    }
}

fn count_json(msg_type: &str, seq: Option<u64>, sold_today: u64) -> Value {
    let mut v = json!({
        "v": 1,
        "svc": SVC,
        "type": msg_type,
        "data": { "sold_today": sold_today }
    });
    if let (Some(seq), Some(obj)) = (seq, v.as_object_mut()) {
        obj.insert("seq".into(), json!(seq));
    }
    v
}
