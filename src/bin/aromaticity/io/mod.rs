use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Read, Stdin, StdoutLock, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

pub fn stdout_is_tty() -> bool {
    io::stdout().is_terminal()
}

pub enum InputSource {
    File(BufReader<File>),
    Stdin(BufReader<Stdin>),
}

impl Read for InputSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputSource::File(r) => r.read(buf),
            InputSource::Stdin(r) => r.read(buf),
        }
    }
}

impl BufRead for InputSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            InputSource::File(r) => r.fill_buf(),
            InputSource::Stdin(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            InputSource::File(r) => r.consume(amt),
            InputSource::Stdin(r) => r.consume(amt),
        }
    }
}

/// Opens `path`, or stdin when `None`.
pub fn open_input(path: Option<&Path>) -> Result<InputSource> {
    match path {
        Some(p) => {
            let file =
                File::open(p).with_context(|| format!("Failed to open MolFile: {}", p.display()))?;
            Ok(InputSource::File(BufReader::new(file)))
        }
        None => Ok(InputSource::Stdin(BufReader::new(io::stdin()))),
    }
}

/// Reads a whole MolFile from `path`, or from stdin when `None`.
pub fn read_molfile(path: Option<&Path>) -> Result<String> {
    let mut input = open_input(path)?;
    let mut text = String::new();
    input.read_to_string(&mut text).with_context(|| match path {
        Some(p) => format!("Failed to read MolFile: {}", p.display()),
        None => "Failed to read MolFile from stdin".to_string(),
    })?;
    Ok(text)
}

pub enum OutputTarget {
    File(BufWriter<File>),
    Stdout(BufWriter<StdoutLock<'static>>),
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::File(w) => w.write(buf),
            OutputTarget::Stdout(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::File(w) => w.flush(),
            OutputTarget::Stdout(w) => w.flush(),
        }
    }
}

/// Creates (or truncates) `path`, or locks stdout when `None`.
pub fn create_output(path: Option<&Path>) -> Result<OutputTarget> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Ok(OutputTarget::File(BufWriter::new(file)))
        }
        None => Ok(OutputTarget::Stdout(BufWriter::new(io::stdout().lock()))),
    }
}

/// Writes an exported document and returns the absolute path it landed at.
/// Existing files are overwritten.
pub fn write_export(path: &Path, contents: &str) -> Result<PathBuf> {
    let mut out = create_output(Some(path))?;
    out.write_all(contents.as_bytes())
        .and_then(|_| out.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    std::path::absolute(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_molfile_returns_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ethanol.mol");
        std::fs::write(&path, "ethanol\n  RDKit\n\n  3  2  0  0  0  0  0  0  0  0999 V2000\n").unwrap();

        let text = read_molfile(Some(&path)).unwrap();
        assert!(text.contains("V2000"));
    }

    #[test]
    fn read_molfile_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_molfile(Some(&dir.path().join("missing.mol"))).unwrap_err();
        assert!(err.to_string().contains("Failed to open MolFile"));
        assert!(err.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn write_export_overwrites_and_returns_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        std::fs::write(&path, "old contents that are longer").unwrap();

        let written = write_export(&path, "<svg/>").unwrap();
        assert!(written.is_absolute());
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "<svg/>");
    }

    #[test]
    fn write_export_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.mol");
        assert!(write_export(&path, "x").is_err());
    }
}
