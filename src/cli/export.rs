//! `rcml export`: recipe markup to JSON.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};

use crate::discovery::load_document;
use crate::error::{RcmlError, Result};
use crate::grammar::Grammar;
use crate::output::{display_path, Printer};
use crate::recipe::{Recipe, RecipeRecord};
use crate::render::{to_json, write_json};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// The grouped document, field by field
    #[default]
    Grouped,
    /// The storage record (slug, publication dates, changelog)
    Record,
}

/// Export a recipe file as JSON
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Recipe file to export
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Grouped)]
    pub format: ExportFormat,

    /// Date to use for missing changelog dates (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,

    /// Write to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExportArgs, grammar: &Grammar, printer: &Printer) -> Result<()> {
    let grouped = load_document(&args.file, grammar)?;

    let value = match args.format {
        ExportFormat::Grouped => serde_json::to_value(&grouped),
        ExportFormat::Record => {
            let today = args.today.unwrap_or_else(|| Local::now().date_naive());
            let record = RecipeRecord::from_recipe(Recipe::from_grouped(&grouped)?, today);
            serde_json::to_value(&record)
        }
    }
    .map_err(|e| RcmlError::Storage {
        message: format!("Failed to serialize JSON: {}", e),
    })?;

    match &args.output {
        Some(path) => {
            write_json(&value, path)?;
            printer.status("Exported", &format!("{} -> {}", display_path(&args.file), display_path(path)));
        }
        None => println!("{}", to_json(&value)?),
    }

    Ok(())
}
