use std::{
    fs::{File, OpenOptions},
    io::{self, Read, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use bib2rfc::{
    format::{Compose, Format, Parse, Reader, Writer},
    Error, ErrorKind,
};

use eyre::{eyre, Context, Result};
use glob::glob;
use log::trace;

#[allow(clippy::module_name_repetitions)]
pub struct FormatFile<F: Format> {
    file: File,
    path: PathBuf,
    _format: PhantomData<F>,
}

impl<F: Format> FormatFile<F> {
    fn new(file: File, path: PathBuf) -> Self {
        Self {
            file,
            path,
            _format: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<F: Parse> Reader for FormatFile<F> {
    type Format = F;

    fn read(&mut self) -> Result<Self::Format, Error> {
        let mut content = String::new();
        self.file
            .read_to_string(&mut content)
            .map_err(|err| Error::wrap(ErrorKind::IO, err))?;
        Ok(F::new(content))
    }
}

impl<F: Compose> Writer for FormatFile<F> {
    type Format = F;

    fn write(&mut self, format: F) -> Result<(), Error> {
        let s = format.raw();
        self.file
            .write_all(s.as_bytes())
            .and_then(|()| self.file.flush())
            .map_err(|err| Error::wrap(ErrorKind::IO, err))
    }
}

/// Turns a failure to open `path` into a message telling a missing file apart from missing
/// permissions.
fn open_error(err: io::Error, path: &Path) -> eyre::Report {
    match err.kind() {
        io::ErrorKind::NotFound => eyre!("The file '{}' was not found", path.display()),
        io::ErrorKind::PermissionDenied => eyre!(
            "Permission denied when opening the '{}' file",
            path.display()
        ),
        _ => eyre::Report::new(err)
            .wrap_err(format!("Failed to open the '{}' file", path.display())),
    }
}

/// Opens an existing file for reading, the extension of `F` is added when `path` has none.
pub fn open_file_by_name<F, P>(path: P) -> Result<FormatFile<F>>
where
    F: Format,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let path_buf = if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(F::ext())
    };

    trace!("opening {} file as a {} file", path_buf.display(), F::name());
    OpenOptions::new()
        .read(true)
        .open(&path_buf)
        .map_err(|err| open_error(err, &path_buf))
        .map(|file| FormatFile::new(file, path_buf))
}

/// Creates `path`, or truncates it when it exists, for writing.
pub fn create_file_by_name<F, P>(path: P) -> Result<FormatFile<F>>
where
    F: Format,
    P: AsRef<Path>,
{
    let path_buf = path.as_ref().to_path_buf();

    trace!("creating {} file for {}", path_buf.display(), F::name());
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path_buf)
        .map_err(|err| open_error(err, &path_buf))
        .map(|file| FormatFile::new(file, path_buf))
}

#[inline]
pub fn find_format_file_in_current_directory<F: Format>() -> Result<FormatFile<F>> {
    find_format_file_in_directory(".")
}

fn find_format_file_in_directory<F, P>(dir: P) -> Result<FormatFile<F>>
where
    F: Format,
    P: AsRef<Path>,
{
    let path = dir.as_ref();
    if !path.is_dir() {
        return Err(eyre!("Path entered is not a directory"));
    }

    let pattern = format!("{}/*.{}", path.to_string_lossy(), F::ext());

    let mut iter = glob(&pattern).wrap_err("Cannot search for files in the directory")?;

    let path_buf = iter
        .next()
        .ok_or_else(|| {
            eyre!(
                "No .{} file found in the '{}' directory",
                F::ext(),
                path.display()
            )
        })?
        .wrap_err("Cannot determine a file path - Do you have the correct permissions?")?;

    if iter.next().is_some() {
        return Err(eyre!(
            "More than one .{} file found - name the input file to select one",
            F::ext()
        ));
    }

    open_file_by_name(path_buf)
}
