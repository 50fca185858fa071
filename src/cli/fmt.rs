//! `rcml fmt`: canonical re-serialization.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::read_source;
use crate::error::{RcmlError, Result};
use crate::grammar::Grammar;
use crate::output::{display_path, Printer};
use crate::parser::parse;
use crate::render::TextRenderer;

/// Rewrite a recipe file in canonical form
#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Recipe file to format
    pub file: PathBuf,

    /// Overwrite the file instead of printing to stdout
    #[arg(long, conflicts_with = "check")]
    pub write: bool,

    /// Fail if the file is not already formatted
    #[arg(long)]
    pub check: bool,
}

/// The canonical text of a recipe source.
pub fn format_source(source: &str, grammar: &Grammar) -> Result<String> {
    let document = parse(source, grammar)?;
    TextRenderer::new(grammar).render(&document)
}

pub fn run(args: FmtArgs, grammar: &Grammar, printer: &Printer) -> Result<()> {
    let source = read_source(&args.file)?;
    let formatted = format_source(&source, grammar)?;
    let unchanged = formatted == source;

    if args.check {
        if !unchanged {
            return Err(RcmlError::NotFormatted { path: args.file });
        }
        printer.status("Checked", &display_path(&args.file));
    } else if args.write {
        if unchanged {
            printer.info("Unchanged", &display_path(&args.file));
        } else {
            write_file(&args.file, &formatted)?;
            printer.status("Formatted", &display_path(&args.file));
        }
    } else {
        print!("{}", formatted);
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| RcmlError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write recipe: {}", e),
    })
}
