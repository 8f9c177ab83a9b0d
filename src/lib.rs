//! Taskline: chat-command task tracking for group messaging channels.
//!
//! This crate implements the core of a group-chat to-do bot: members issue
//! `#`-prefixed text commands to create, list, modify, complete, and delete
//! shared tasks, with optional priorities, due dates, and recurring
//! schedules.
//!
//! # Architecture
//!
//! Taskline follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`command`]: Marker-prefixed command lexing and parsing
//! - [`task`]: Task lifecycle, recurrence expansion, and persistence
//! - [`reply`]: Deterministic reply rendering
//! - [`bot`]: Inbound chat event dispatch and novelty draws
//! - [`config`]: Environment-driven configuration
//!
//! The messaging transport (webhook verification, reply delivery) and the
//! scheduled trigger transport live outside this crate; they consume
//! [`bot::ChatService`] and the lifecycle service's recurrence generation
//! entry point respectively.

pub mod bot;
pub mod command;
pub mod config;
pub mod reply;
pub mod task;
