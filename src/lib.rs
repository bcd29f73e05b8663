#![allow(dead_code, unused_imports)]
//! Solblink - Solana DeFi Market Browser and Blink Action Runner
//!
//! Browses DeFi markets via a third-party aggregator API and executes
//! pre-built blockchain transactions (Blinks) that protocols expose as
//! HTTP action endpoints.
//!
//! # Modules
//!
//! - `domain`: Transaction decoding shared by the pipeline
//! - `ports`: Trait seams (signing capability) and test mocks
//! - `adapters`: External implementations (Blink protocol, Solana RPC pool,
//!   aggregator API, CLI definitions)
//! - `config`: Configuration loading and validation
//! - `application`: The execution pipeline

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
