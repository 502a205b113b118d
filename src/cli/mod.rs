//! CLI module for recurd - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running the worker
//! and inspecting the due set.

pub mod commands;

pub use commands::Cli;
