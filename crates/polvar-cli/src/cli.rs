use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "polvar",
    about = "polvar: resolve variable values for policy dry runs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where variable values come from.
#[derive(Args, Debug, Clone, Default)]
pub struct ValueSources {
    /// Path to a values document (YAML or JSON)
    #[arg(long, short = 'f')]
    pub values_file: Option<String>,

    /// Variable override as key=value (repeatable, comma separated)
    #[arg(long = "set", short = 's', value_delimiter = ',')]
    pub set: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the values one (policy, resource) pair is evaluated with
    Resolve {
        /// Policy name
        #[arg(long)]
        policy: String,

        /// Resource name
        #[arg(long)]
        resource: String,

        /// Resource kind
        #[arg(long, default_value = "")]
        kind: String,

        /// Kind for which missing values are an error (repeatable)
        #[arg(long = "check-kind")]
        check_kinds: Vec<String>,

        /// Variable referenced by the policy (repeatable)
        #[arg(long = "declare")]
        declared: Vec<String>,

        #[command(flatten)]
        sources: ValueSources,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish per-rule values and print the registry content
    Publish {
        #[command(flatten)]
        sources: ValueSources,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize the supplied values document and overrides
    Describe {
        #[command(flatten)]
        sources: ValueSources,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
