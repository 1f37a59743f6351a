//! CLI command definitions for the `axmx` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod draft;
pub mod serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Generate product drafts and publish them to commerce channels.
#[derive(Parser)]
#[command(name = "axmx", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log filter used when neither RUST_LOG nor -v is given.
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Path to an autonomax.toml settings file.
    #[arg(long, env = "AUTONOMAX_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> String {
        match self.verbose {
            0 if self.quiet => "error".to_string(),
            0 => self.log_level.clone(),
            1 => "info,autonomax_core=debug,autonomax_infra=debug,autonomax_api=debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server and the publish worker.
    Serve {
        /// Port to listen on (overrides API_PORT).
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (overrides API_HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate one draft and print it.
    Draft(DraftArgs),
}

/// Brief for a one-shot draft: a JSON file, or the fields inline.
#[derive(Args)]
pub struct DraftArgs {
    /// Read the brief from a JSON file.
    #[arg(long, conflicts_with_all = ["category", "audience", "keyword"])]
    pub brief: Option<PathBuf>,

    /// Product category (e.g. "Zen Print").
    #[arg(long, required_unless_present = "brief")]
    pub category: Option<String>,

    /// Target audience.
    #[arg(long, required_unless_present = "brief")]
    pub audience: Option<String>,

    /// Keyword to include (repeatable, order preserved).
    #[arg(long = "keyword", short = 'k')]
    pub keyword: Vec<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_inline_draft() {
        let cli = Cli::try_parse_from([
            "axmx",
            "draft",
            "--category",
            "Zen Print",
            "--audience",
            "home decor buyers",
            "-k",
            "minimal",
            "-k",
            "serene",
        ])
        .unwrap();
        match cli.command {
            Commands::Draft(args) => {
                assert_eq!(args.category.as_deref(), Some("Zen Print"));
                assert_eq!(args.keyword, vec!["minimal", "serene"]);
                assert!(args.brief.is_none());
            }
            _ => panic!("expected draft command"),
        }
    }

    #[test]
    fn draft_requires_category_without_brief_file() {
        assert!(Cli::try_parse_from(["axmx", "draft", "--audience", "buyers"]).is_err());
    }

    #[test]
    fn brief_file_conflicts_with_inline_fields() {
        assert!(
            Cli::try_parse_from([
                "axmx",
                "draft",
                "--brief",
                "brief.json",
                "--category",
                "Zen Print"
            ])
            .is_err()
        );
    }

    #[test]
    fn verbosity_selects_filter() {
        let cli = Cli::try_parse_from(["axmx", "-vv", "serve"]).unwrap();
        assert_eq!(cli.log_filter(), "trace");

        let cli = Cli::try_parse_from(["axmx", "--quiet", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.log_filter(), "error");
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000), .. }));
    }
}
