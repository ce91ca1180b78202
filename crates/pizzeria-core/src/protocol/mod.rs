//! Wire formats.
//!
//! Only the text lane exists: JSON envelopes whose `data` payload stays raw
//! until a service asks for it. Parsers report malformed input as
//! `PizzeriaError` instead of panicking.

pub mod text;
