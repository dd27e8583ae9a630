//! polvar CLI: the `polvar` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            policy,
            resource,
            kind,
            check_kinds,
            declared,
            sources,
            json,
        } => commands::resolve::run(commands::resolve::Args {
            policy,
            resource,
            kind,
            check_kinds,
            declared,
            sources,
            json,
        }),

        Commands::Publish { sources, json } => commands::publish::run(sources, json),

        Commands::Describe { sources, json } => commands::describe::run(sources, json),
    }
}
