//! Text envelope (JSON).
//!
//! `data` is kept as `RawValue` so services parse their own payloads lazily.

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::{PizzeriaError, Result};

/// Only protocol version accepted on the wire.
pub const PROTOCOL_VERSION: u8 = 1;

/// Inbound text frame.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Protocol version.
    pub v: u8,
    /// Service name (e.g., "pizza").
    pub svc: String,
    /// Message type (field name is `type` in JSON).
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Optional client correlation number, echoed in replies.
    #[serde(default)]
    pub seq: Option<u64>,
    /// Optional payload, stored as raw JSON (lazy parsing).
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

/// Version header only; unknown fields are ignored so newer envelopes still
/// report their version.
#[derive(Deserialize)]
struct VersionHeader {
    v: u64,
}

impl Envelope {
    /// Version-check, then strictly parse a text frame.
    pub fn decode(s: &str) -> Result<Self> {
        let header: VersionHeader = serde_json::from_str(s)
            .map_err(|e| PizzeriaError::BadRequest(format!("invalid envelope json: {e}")))?;
        if header.v != u64::from(PROTOCOL_VERSION) {
            return Err(PizzeriaError::UnsupportedVersion);
        }
        serde_json::from_str(s)
            .map_err(|e| PizzeriaError::BadRequest(format!("invalid envelope json: {e}")))
    }
}
