//! Shared foundational types used across the ESTA timing analysis engine.
//!
//! This crate provides interned node-name identifiers and the fatal
//! [`EstaError`] type that every `esta_*` crate in the core pipeline returns.

#![warn(missing_docs)]

pub mod error;
pub mod ident;
pub mod transition;

pub use error::{EstaError, EstaResult};
pub use ident::{Ident, Interner};
pub use transition::Transition;
