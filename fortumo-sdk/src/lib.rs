//! Shared types for Fortumo mobile payment integrations.
//!
//! This crate carries the request signature scheme and the serializable
//! objects exchanged with callers. It does not depend on an async runtime.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

pub mod objects;
pub mod signature;
