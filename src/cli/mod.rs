//! CLI module for variantai - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for one-shot questions,
//! the interactive chat, and tool listing.

pub mod commands;

pub use commands::Cli;
