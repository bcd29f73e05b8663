//! Blink Adapter
//!
//! Implementation of the Solana Actions protocol: describe an action
//! endpoint, build an unsigned transaction for a wallet, and flatten
//! metadata into executable entries.

mod client;
mod types;

pub use client::{merge_query_params, resolve_action_href, BlinkClient, BlinkError};
pub use types::{
    ActionDisplay, ActionMetadata, ActionParameter, BlinkAction, BlinkTransaction, LinkedAction,
};
