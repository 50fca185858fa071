pub mod check;
pub mod completions;
pub mod export;
pub mod fmt;
pub mod import;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::error::Result;
use crate::grammar::Grammar;

/// rcml - recipe markup tools
#[derive(Parser, Debug)]
#[command(name = "rcml")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Grammar file to use instead of the built-in recipe grammar
    #[arg(long, global = true, value_name = "YAML")]
    pub grammar: Option<PathBuf>,

    /// More log output (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// The grammar given with `--grammar`, if any.
    pub fn grammar_override(&self) -> Result<Option<Grammar>> {
        self.grammar.as_deref().map(Grammar::load).transpose()
    }

    /// The grammar given with `--grammar`, or the built-in one.
    pub fn load_grammar(&self) -> Result<Grammar> {
        Ok(self.grammar_override()?.unwrap_or_default())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse and validate recipe files
    Check(check::CheckArgs),

    /// Rewrite a recipe file in canonical form
    Fmt(fmt::FmtArgs),

    /// Export a recipe file as JSON
    Export(export::ExportArgs),

    /// Turn a JSON recipe record back into recipe markup
    Import(import::ImportArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
