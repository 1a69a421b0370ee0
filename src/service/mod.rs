//! Business logic layer.
//!
//! Services load records through the repositories, apply domain transitions from
//! `model`, persist the result and push any display changes out through a
//! `ChatGateway`. They never talk to serenity directly, which keeps every operation
//! testable against an in-memory gateway.

pub mod gateway;
pub mod poll;
pub mod response;
