//! Sharp Core - Shared domain types.
//!
//! This crate provides the domain vocabulary used across the Sharp
//! storefront: type-safe IDs, email addresses, order numbers, order
//! statuses, and decimal money helpers.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Database encode/decode support for the
//! newtypes is gated behind the `postgres` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
