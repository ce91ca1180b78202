//! WebSocket handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS
//! - Open one session scope per connection (closed when the connection ends)
//! - Lifecycle: ping + idle timeout
//! - Decode-once then dispatch to text services with the scope's context

use axum::{
    extract::{ws::Message, ws::WebSocket, ws::WebSocketUpgrade, State},
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use pizzeria_core::{PizzaCounterFactory, ScopeId};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::Instrument;

use pizzeria_core::error::{PizzeriaError, Result};

use crate::app_state::AppState;
use crate::session::{ScopeGuard, SessionCtx};
use crate::transport::codec::{decode, Inbound};

// --------------------
// sys frames
// --------------------
pub fn sys_welcome_json(scope: ScopeId, sold_today: u64) -> String {
    json!({
        "v": 1,
        "svc": "sys",
        "type": "welcome",
        "data": {
            "scope": scope.to_string(),
            "sold_today": sold_today
        }
    })
    .to_string()
}

pub fn sys_error_json(code: &str, msg: &str) -> String {
    json!({
        "v": 1,
        "svc": "sys",
        "type": "error",
        "data": {
            "code": code,
            "msg": msg
        }
    })
    .to_string()
}

fn error_frame(e: &PizzeriaError) -> Message {
    Message::Text(sys_error_json(e.client_code().as_str(), &e.to_string()))
}

/// Frames above `sessions.max_frame_bytes` get a `PAYLOAD_TOO_LARGE` reply and
/// the session stays open; frames above this multiple of it are refused by
/// the WebSocket layer and end the connection.
pub const TRANSPORT_LIMIT_FACTOR: usize = 4;

/// Largest message the WebSocket layer will buffer for a session.
pub fn transport_message_limit(max_frame_bytes: usize) -> usize {
    max_frame_bytes.saturating_mul(TRANSPORT_LIMIT_FACTOR)
}

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let limit = transport_message_limit(app.cfg().sessions.max_frame_bytes);
    ws.max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| async move {
            if let Err(e) = run_session(app, socket).await {
                tracing::debug!(error = %e, "session ended with error");
            }
        })
}

async fn run_session(app: AppState, socket: WebSocket) -> Result<()> {
    let (mut ws_tx, ws_rx) = socket.split();
    let metrics = app.metrics();

    let guard = match app.scopes().open_guarded() {
        Ok(g) => g,
        Err(e) => {
            metrics.scopes_rejected.inc(&[]);
            let _ = ws_tx.send(error_frame(&e)).await;
            let _ = ws_tx.send(Message::Close(None)).await;
            return Err(e);
        }
    };

    metrics.scopes_opened.inc(&[]);
    metrics.scopes_active.inc(&[]);

    let span = tracing::info_span!("session", scope = %guard.id());
    let res = session_loop(&app, &guard, ws_tx, ws_rx).instrument(span).await;

    metrics.scopes_active.dec(&[]);
    drop(guard);
    res
}

// --------------------
// Core session loop
// --------------------
async fn session_loop<Tx, Rx>(
    app: &AppState,
    guard: &ScopeGuard<PizzaCounterFactory>,
    mut ws_tx: Tx,
    mut ws_rx: Rx,
) -> Result<()>
where
    Tx: Sink<Message> + Unpin,
    Rx: Stream<Item = std::result::Result<Message, axum::Error>> + Unpin,
{
    let gw = &app.cfg().gateway;
    let max_frame_bytes = app.cfg().sessions.max_frame_bytes;
    let metrics = app.metrics();
    let dispatcher = app.dispatcher();

    let (out_tx, mut out_rx) = mpsc::channel::<Message>(gw.outbound_queue);
    let ctx = SessionCtx::new(guard.scope(), out_tx.clone(), app.metrics());

    out_tx
        .try_send(Message::Text(sys_welcome_json(guard.id(), ctx.counter().current_value())))
        .map_err(|_| PizzeriaError::Internal("outbound channel closed".into()))?;
    tracing::debug!("session started");

    let ping_every = Duration::from_millis(gw.ping_interval_ms);
    let idle_timeout = Duration::from_millis(gw.idle_timeout_ms);

    let mut ping_tick = tokio::time::interval(ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                let Some(m) = maybe_out else { break; };
                if ws_tx.send(m).await.is_err() {
                    break;
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(Ok(msg)) = incoming else { break; };
                last_activity = Instant::now();

                match decode(msg, max_frame_bytes) {
                    Ok(Inbound::Text(env)) => {
                        if let Err(e) = dispatcher.dispatch_text(ctx.clone(), env).await {
                            metrics.service_errors.inc(&[("code", e.client_code().as_str())]);
                            tracing::debug!(error = %e, "service error");
                            let _ = out_tx.try_send(error_frame(&e));
                        }
                    }
                    Ok(Inbound::Ping(payload)) => {
                        let _ = out_tx.try_send(Message::Pong(payload));
                    }
                    Ok(Inbound::Pong) => {}
                    Ok(Inbound::Close) => break,
                    Err(e) => {
                        metrics.decode_errors.inc(&[("code", e.client_code().as_str())]);
                        tracing::debug!(error = %e, "decode failed");
                        let _ = out_tx.try_send(error_frame(&e));
                    }
                }
            }

            _ = ping_tick.tick() => {
                let _ = out_tx.try_send(Message::Ping(Vec::new()));
            }

            // idle timeout
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if last_activity.elapsed() >= idle_timeout {
                    tracing::debug!("idle timeout");
                    let timeout_frame = Message::Text(sys_error_json("TIMEOUT", "idle timeout"));
                    let _ = ws_tx.send(timeout_frame).await;
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    }

    tracing::debug!(sold_today = ctx.counter().current_value(), "session finished");
    Ok(())
}
