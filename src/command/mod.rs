//! Marker-prefixed chat command lexing and parsing.
//!
//! Raw message text becomes a typed [`domain::Command`] or a typed
//! [`domain::CommandParseError`]; malformed input never reaches the task
//! lifecycle engine.

pub mod domain;

#[cfg(test)]
mod tests;
