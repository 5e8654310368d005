use clap::Parser;

pub mod root_commands;

pub use root_commands::{ClassifyArgs, Commands, SchemaArgs, SchemaTarget, ServeArgs};

/// Top-level CLI parser for the `herald` binary.
#[derive(Debug, Parser)]
#[command(name = "herald", version, about = "Herald - tracker webhook notifier")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, SchemaTarget};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["herald", "serve", "--verbose"]).expect("cli should parse");
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert!(matches!(cli.command, Commands::Serve(ref args) if args.bind.is_none()));
    }

    #[test]
    fn serve_accepts_bind_override() {
        let cli = Cli::try_parse_from(["herald", "serve", "--bind", "127.0.0.1:8080"])
            .expect("cli should parse");
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind.as_deref(), Some("127.0.0.1:8080"));
    }

    #[test]
    fn classify_reads_path_and_flags() {
        let cli = Cli::try_parse_from(["herald", "classify", "event.json", "--final"])
            .expect("cli should parse");
        let Commands::Classify(args) = cli.command else {
            panic!("expected classify");
        };
        assert_eq!(args.input, Some(PathBuf::from("event.json")));
        assert!(args.finalize);
        assert!(!args.stats);
    }

    #[test]
    fn classify_final_and_stats_conflict() {
        let result = Cli::try_parse_from(["herald", "classify", "--final", "--stats"]);
        assert!(result.is_err());
    }

    #[test]
    fn schema_target_defaults_to_envelope() {
        let cli = Cli::try_parse_from(["herald", "schema"]).expect("cli should parse");
        let Commands::Schema(args) = cli.command else {
            panic!("expected schema");
        };
        assert_eq!(args.target, SchemaTarget::Envelope);

        let cli = Cli::try_parse_from(["herald", "schema", "project-update"])
            .expect("cli should parse");
        let Commands::Schema(args) = cli.command else {
            panic!("expected schema");
        };
        assert_eq!(args.target, SchemaTarget::ProjectUpdate);
    }

    #[test]
    fn unknown_schema_target_is_rejected() {
        assert!(Cli::try_parse_from(["herald", "schema", "team"]).is_err());
    }
}
