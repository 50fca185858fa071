use clap::Parser;
use miette::Result;
use rcml::cli::{self, Cli, Commands};
use rcml::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level())),
        )
        .init();

    let printer = Printer::new();
    let grammar = cli.grammar_override()?;

    match cli.command {
        Commands::Check(args) => cli::check::run(args, grammar, &printer)?,
        Commands::Fmt(args) => cli::fmt::run(args, &grammar.unwrap_or_default(), &printer)?,
        Commands::Export(args) => cli::export::run(args, &grammar.unwrap_or_default(), &printer)?,
        Commands::Import(args) => cli::import::run(args, &grammar.unwrap_or_default(), &printer)?,
        Commands::Completions(args) => cli::completions::run(args)?,
    }

    Ok(())
}
