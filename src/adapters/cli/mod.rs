//! CLI Adapter
//!
//! Command-line argument definitions; handlers live in the binary crate.

mod commands;

pub use commands::{
    CliApp, Command, HealthCmd, InspectCmd, MarketsCmd, PositionsCmd, RunCmd, SimulateCmd,
};
