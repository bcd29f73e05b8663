//! Domain Layer - Core transaction artifacts for the execution pipeline
//!
//! This module contains pure domain types and logic with no network
//! dependencies. All external interactions happen through the adapters layer.

pub mod transaction;

pub use transaction::{DecodeError, DecodedTransaction};
