use std::{
    io::{self, Write as _},
    path::PathBuf,
};

use bib2rfc::{
    ast::{Biblio, BiblioResolver},
    format::{BibTex, Compose, Format, Kdrfc, Reader, RfcXml, Writer},
    observer::LogObserver,
};

use clap::{Args, Subcommand};
use eyre::{Context, Result};
use log::{trace, warn};

use crate::file::{create_file_by_name, find_format_file_in_current_directory, open_file_by_name};

#[derive(Subcommand)]
#[non_exhaustive]
pub enum Commands {
    /// Convert BibTeX entries to RFC XML v3 reference elements
    Convert(ConvertArgs),
    /// Convert BibTeX entries to kramdown-rfc YAML references
    ToKdrfc(ConvertArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// The BibTeX file to read
    ///
    /// When omitted the single .bib file in the current directory is used.
    #[clap(parse(from_os_str))]
    input: Option<PathBuf>,

    /// The file to write, standard output when omitted
    #[clap(parse(from_os_str))]
    output: Option<PathBuf>,

    /// Leave out entries that are not valid instead of stopping at the first one
    #[clap(long)]
    skip_invalid: bool,
}

impl Commands {
    /// Runs the command, returning a summary to show the user when there is one.
    pub fn execute(self) -> Result<Option<String>> {
        match self {
            Commands::Convert(args) => args.run::<RfcXml>(),
            Commands::ToKdrfc(args) => args.run::<Kdrfc>(),
        }
    }
}

impl ConvertArgs {
    fn run<F: Compose>(self) -> Result<Option<String>> {
        let mut input = if let Some(path) = &self.input {
            trace!("'input' argument used with value of '{}'", path.display());
            open_file_by_name::<BibTex, _>(path)?
        } else {
            trace!("'input' argument not used - try and find a .bib file in current directory");
            find_format_file_in_current_directory::<BibTex>()?
        };

        let biblio = match input.read_biblio().wrap_err_with(|| {
            format!("Cannot read BibTeX from '{}'", input.path().display())
        })? {
            Ok(biblio) => biblio,
            Err(resolver) => self.resolve(resolver)?,
        };

        let (format, count) = self.compose::<F>(&biblio)?;

        if let Some(path) = &self.output {
            let mut file = create_file_by_name::<F, _>(path)?;
            file.write(format)
                .wrap_err_with(|| format!("Cannot write to '{}'", path.display()))?;

            Ok(Some(format!(
                "Conversion completed. {count} entries written to {}.",
                path.display()
            )))
        } else {
            io::stdout()
                .lock()
                .write_all(format.raw().as_bytes())
                .wrap_err("Cannot write to standard output")?;
            Ok(None)
        }
    }

    fn resolve(&self, resolver: BiblioResolver) -> Result<Biblio> {
        if self.skip_invalid {
            for (key, err) in resolver.failures() {
                warn!("Skipping entry '{key}': {err}");
            }
            Ok(resolver.skip_invalid())
        } else {
            Err(eyre::Report::new(resolver).wrap_err("Invalid input: some entries are not valid"))
        }
    }

    /// Converts every record, the count is the number of converted records.
    fn compose<F: Compose>(&self, biblio: &Biblio) -> Result<(F, usize)> {
        let (format, count) = if self.skip_invalid {
            F::compose_valid(biblio, &LogObserver)
        } else {
            F::compose(biblio, &LogObserver).map(|format| (format, biblio.len()))
        }
        .wrap_err_with(|| format!("Cannot convert the entries to {}", F::name()))?;

        Ok((end_with_newline(format), count))
    }
}

fn end_with_newline<F: Format>(format: F) -> F {
    let mut raw = format.raw();
    if !raw.is_empty() && !raw.ends_with('\n') {
        raw.push('\n');
    }
    F::new(raw)
}
