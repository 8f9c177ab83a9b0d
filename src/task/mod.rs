//! Task lifecycle management for Taskline.
//!
//! This module implements the task half of the bot: creating tasks from
//! validated chat commands, batch creation, completion, field updates,
//! deletion, group-scoped listing, and recurring-schedule expansion. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
