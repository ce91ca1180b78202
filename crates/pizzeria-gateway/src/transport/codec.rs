//! Decode-once codec.
//!
//! - Size limit is checked before any parsing
//! - Text frames => Envelope (lazy `RawValue` for data)
//! - Binary frames are rejected (no binary lane)
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;
use pizzeria_core::{
    error::{PizzeriaError, Result},
    protocol::text::Envelope,
};

#[derive(Debug)]
pub enum Inbound {
    Text(Envelope),
    Ping(Vec<u8>),
    Pong,
    Close,
}

pub fn frame_len(msg: &Message) -> usize {
    match msg {
        Message::Text(s) => s.len(),
        Message::Binary(b) => b.len(),
        Message::Ping(v) => v.len(),
        Message::Pong(v) => v.len(),
        Message::Close(_) => 0,
    }
}

pub fn decode(msg: Message, max_frame_bytes: usize) -> Result<Inbound> {
    if frame_len(&msg) > max_frame_bytes {
        return Err(PizzeriaError::PayloadTooLarge);
    }
    match msg {
        Message::Text(s) => Ok(Inbound::Text(Envelope::decode(&s)?)),
        Message::Binary(_) => Err(PizzeriaError::BadRequest(
            "binary frames are not supported".into(),
        )),
        Message::Ping(v) => Ok(Inbound::Ping(v)),
        Message::Pong(_) => Ok(Inbound::Pong),
        Message::Close(_) => Ok(Inbound::Close),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn text_decodes_to_envelope() {
        let msg = Message::Text(r#"{"v":1,"svc":"pizza","type":"sell","seq":9}"#.into());
        match decode(msg, 4096).unwrap() {
            Inbound::Text(env) => {
                assert_eq!(env.svc, "pizza");
                assert_eq!(env.seq, Some(9));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn oversized_frame_rejected_before_parse() {
        let msg = Message::Text("x".repeat(65));
        let err = decode(msg, 64).unwrap_err();
        assert_eq!(err.client_code().as_str(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn binary_rejected() {
        let err = decode(Message::Binary(vec![1, 2, 3]), 4096).unwrap_err();
        assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
    }

    #[test]
    fn control_frames_pass_through() {
        assert!(matches!(
            decode(Message::Ping(vec![7]), 4096).unwrap(),
            Inbound::Ping(p) if p == vec![7]
        ));
        assert!(matches!(decode(Message::Pong(vec![]), 4096).unwrap(), Inbound::Pong));
        assert!(matches!(decode(Message::Close(None), 4096).unwrap(), Inbound::Close));
    }
}
