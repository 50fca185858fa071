//! `rcml check`: parse and validate recipe files.

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use crate::discovery::{discover, discover_paths, DiscoveryResult};
use crate::error::{RcmlError, Result};
use crate::grammar::Grammar;
use crate::output::{plural, Printer};
use crate::validation::validate_recipe;

/// Parse and validate recipe files
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Recipe files, or a project directory (uses its rcml.yaml)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: CheckArgs, grammar: Option<Grammar>, printer: &Printer) -> Result<()> {
    let project = match args.paths.as_slice() {
        [dir] if dir.is_dir() => discover(dir)?,
        paths => discover_paths(paths),
    };
    let grammar = match grammar {
        Some(grammar) => grammar,
        None => project.grammar()?,
    };

    check_project(&project, &grammar, args.strict, printer)
}

fn check_project(project: &DiscoveryResult, grammar: &Grammar, strict: bool, printer: &Printer) -> Result<()> {
    let total = project.scan.total();
    if total == 0 {
        printer.warning("Skipped", "no recipe files found");
        return Ok(());
    }

    let mut failed = 0;
    let mut warnings = 0;

    for file in project.load(grammar) {
        let recipe = match &file.result {
            Ok(recipe) => recipe,
            Err(e) => {
                printer.file_error(&file.path, e);
                failed += 1;
                continue;
            }
        };

        let result = validate_recipe(recipe);
        debug!(path = %file.path.display(), diagnostics = result.iter().count(), "validated recipe");
        for diagnostic in result.iter() {
            printer.diagnostic(&file.path, diagnostic);
        }

        warnings += result.warning_count();
        if result.has_errors() || (strict && result.has_warnings()) {
            failed += 1;
        }
    }

    let summary = format!(
        "{} ({})",
        plural(total, "recipe", "recipes"),
        plural(warnings, "warning", "warnings")
    );

    if failed > 0 {
        printer.error("Failed", &summary);
        return Err(RcmlError::CheckFailed { failed, total });
    }

    printer.status("Checked", &summary);
    Ok(())
}
