//! Deterministic reply rendering.
//!
//! Every engine result and every typed failure maps to a fixed reply
//! template; there is no business logic here. Multi-line renders (listing,
//! detail) go through minijinja, one-liners are plain formatting.

mod formatter;
mod templates;

pub use formatter::{
    ReplyError, batch_created, command_failure, completed, created, deleted, detail, help_text,
    internal_error, listing, parse_failure, recurring_cancelled, recurring_created, updated,
};

#[cfg(test)]
mod tests;
