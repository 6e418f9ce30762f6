#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::process;

mod commands;
mod file;

use commands::Commands;

use clap::Parser;
use log::{error, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let cli = Cli::parse();

    // if quiet then ignore verbosity but still show errors
    let verbosity = if cli.quiet {
        1
    } else {
        cli.verbosity as usize + 1
    };

    stderrlog::new().verbosity(verbosity).init()?;

    trace!("Running with verbosity of {verbosity}");
    if let Some(summary) = cli.command.execute()? {
        if !cli.quiet {
            println!("{summary}");
        }
    }

    Ok(())
}

#[derive(Parser)]
#[clap(name = "bib2rfc")]
#[clap(about = "Convert BibTeX bibliographies to RFC XML and kramdown-rfc references")]
#[clap(version, author)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Prevents the program from writing messages to stdout, errors will still be printed to
    /// stderr.
    #[clap(short, long)]
    quiet: bool,
}
