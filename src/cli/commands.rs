//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - ask: answer a single question
//! - chat: interactive session (default when no subcommand is given)
//! - tools: list the tools the model can call

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// VariantAI - Genomic variant interpreter backed by a language model and lookup tools
#[derive(Parser, Debug)]
#[command(name = "variantai")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer one question and exit
    Ask {
        /// Question about a genetic variant
        question: String,
    },

    /// Start an interactive chat
    Chat {
        /// Continue from an exported chat history
        #[arg(short, long)]
        resume: Option<PathBuf>,
    },

    /// List the tools available to the model
    Tools {
        /// Print the wire schema sent to the model
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args should result in None command (chat mode)
        let cli = Cli::try_parse_from(["variantai"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["variantai", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["variantai", "-c", "/path/to/variantai.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/variantai.yml")));
    }

    #[test]
    fn test_ask_command() {
        let cli = Cli::try_parse_from(["variantai", "ask", "What is chr9:g.107620835G>A?"]).unwrap();
        match cli.command {
            Some(Commands::Ask { question }) => {
                assert_eq!(question, "What is chr9:g.107620835G>A?");
            }
            _ => panic!("Expected ask command"),
        }
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["variantai", "ask"]).is_err());
    }

    #[test]
    fn test_chat_command() {
        let cli = Cli::try_parse_from(["variantai", "chat"]).unwrap();
        match cli.command {
            Some(Commands::Chat { resume }) => assert!(resume.is_none()),
            _ => panic!("Expected chat command"),
        }
    }

    #[test]
    fn test_chat_resume() {
        let cli = Cli::try_parse_from(["variantai", "chat", "--resume", "chat_history.json"]).unwrap();
        match cli.command {
            Some(Commands::Chat { resume }) => {
                assert_eq!(resume, Some(PathBuf::from("chat_history.json")));
            }
            _ => panic!("Expected chat command"),
        }
    }

    #[test]
    fn test_tools_command() {
        let cli = Cli::try_parse_from(["variantai", "tools", "--json", "-v"]).unwrap();
        assert!(cli.is_verbose());
        match cli.command {
            Some(Commands::Tools { json }) => assert!(json),
            _ => panic!("Expected tools command"),
        }
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["variantai", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
