use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level commands.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Listen for tracker webhooks and deliver notifications.
    Serve(ServeArgs),
    /// Classify one webhook payload and print the result.
    Classify(ClassifyArgs),
    /// Print the JSON Schema of a payload or result type.
    Schema(SchemaArgs),
}

/// Arguments for `herald serve`.
#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding `server.bind`.
    #[arg(long)]
    pub bind: Option<String>,
}

/// Arguments for `herald classify`.
#[derive(Clone, Debug, Args)]
pub struct ClassifyArgs {
    /// Payload file. Reads stdin when omitted or `-`.
    pub input: Option<PathBuf>,
    /// Print the text that would be delivered instead of the result JSON.
    #[arg(long = "final", conflicts_with = "stats")]
    pub finalize: bool,
    /// Print a compact type/action/priority summary.
    #[arg(long)]
    pub stats: bool,
}

/// Arguments for `herald schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum, default_value_t = SchemaTarget::Envelope)]
    pub target: SchemaTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaTarget {
    Envelope,
    Issue,
    Comment,
    Project,
    ProjectUpdate,
    Cycle,
    Sla,
    Result,
}
