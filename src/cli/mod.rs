//! Command line interface for Tridex.

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used types
pub use args::{Command, OutputFormat, TridexArgs};
pub use commands::{execute_command, open_engine};
pub use output::{HumanOutput, output_result};
