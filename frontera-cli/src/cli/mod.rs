//! Command-line interface orchestration for frontera.
//!
//! Every command reads one Matrix Market file, builds a graph of the
//! requested kind and runs a single algorithm over it.

mod commands;

pub use commands::{
    BetweennessCommand, BfsCommand, BfsOutput, Cli, CliError, Command, ComponentsCommand,
    ExecutionSummary, GraphArgs, GraphInfo, InfoCommand, SamplingArg, render_summary, run_cli,
};
