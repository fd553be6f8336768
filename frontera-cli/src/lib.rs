//! Support library for the frontera CLI binary.
//!
//! Re-exports the CLI module so doctests and integration tests can exercise
//! the commands without forking a subprocess.

pub mod cli;
pub mod logging;
