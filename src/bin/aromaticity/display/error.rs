use std::io::{self, Write};

use anyhow::Error;

use aromaticity::{ConfigError, NamingError, SourceKind, ToolkitError};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_toolkit_hints(err);
        collector.collect_naming_hints(err);
        collector.collect_config_hints(err);
        collector.collect_io_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_toolkit_hints(&mut self, err: &Error) {
        let Some(toolkit_err) = err.downcast_ref::<ToolkitError>() else {
            return;
        };

        self.mark_typed();

        match toolkit_err {
            ToolkitError::Launch { program, .. } => {
                self.add(format!("Could not start the Python interpreter '{program}'"));
                self.add("Point --python (or [toolkit] python) at an interpreter with RDKit");
            }

            ToolkitError::Unavailable(msg) => {
                if msg.to_lowercase().contains("rdkit") {
                    self.add("RDKit is not installed for this interpreter");
                    self.add("Install it with `pip install rdkit` or `conda install -c conda-forge rdkit`");
                } else {
                    self.add("The toolkit session did not complete its handshake");
                }
                self.add("Use --python to select a different interpreter");
            }

            ToolkitError::Closed | ToolkitError::Io { .. } => {
                self.add("The RDKit session stopped responding");
                self.add("Run with --log-level debug to see the protocol traffic");
            }

            ToolkitError::Protocol(_) => {
                self.add("The toolkit answered with an unexpected message");
                self.add("Make sure nothing else writes to the interpreter's stdout (e.g. PYTHONSTARTUP)");
            }

            ToolkitError::InvalidInput { kind, .. } => match kind {
                SourceKind::Smiles => {
                    self.add("RDKit could not parse the SMILES string");
                    self.add("Quote the SMILES in your shell, e.g. aromaticity 'C[C@H](N)C(=O)O'");
                    self.add("Check ring closure digits, brackets and aromatic atoms");
                }
                SourceKind::MolFile => {
                    self.add("RDKit could not parse the MolFile");
                    self.add("Verify the counts line and the V2000/V3000 atom and bond blocks");
                }
            },

            ToolkitError::Rejected { operation, .. } => {
                self.add(format!("RDKit failed while running '{operation}'"));
                self.add("The molecule may be unsupported for this calculation");
            }

            ToolkitError::UnexpectedValue { .. } => {
                self.add("The installed RDKit returned a value of an unexpected type");
                self.add("Try a more recent RDKit release");
            }

            ToolkitError::NotCompiled(kind) => {
                self.add(format!("This build does not include the '{kind}' toolkit"));
                self.add("Rebuild with `--features embedded` or use --toolkit rdkit");
            }

            #[cfg(feature = "embedded")]
            ToolkitError::Python(_) => {
                self.add("The embedded Python interpreter raised an exception");
                self.add("Check that RDKit is importable from the linked Python");
            }
        }
    }

    fn collect_naming_hints(&mut self, err: &Error) {
        let Some(naming_err) = err.downcast_ref::<NamingError>() else {
            return;
        };

        self.mark_typed();

        match naming_err {
            NamingError::InvalidEndpoint { .. } => {
                self.add("Naming endpoints must look like https://host[:port][/path]");
            }
            NamingError::TlsNotCompiled { .. } => {
                self.add("This build was compiled without the `tls` feature");
                self.add("Use an http:// endpoint or rebuild with default features");
            }
            NamingError::Status { provider, status } => {
                self.add(format!("{provider} rejected the request (HTTP {status})"));
                self.add("Try the other service with --naming-service");
            }
            _ => {
                self.add("The naming service could not be reached");
                self.add("Check your network connection or raise [naming] timeout_ms");
            }
        }
    }

    fn collect_config_hints(&mut self, err: &Error) {
        let Some(config_err) = err.downcast_ref::<ConfigError>() else {
            return;
        };

        self.mark_typed();

        match config_err {
            ConfigError::Read { .. } => {
                self.add("Check the --config path or the AROMATICITY_CONFIG variable");
            }
            ConfigError::Parse { .. } => {
                self.add("Configuration files are TOML with [toolkit], [naming], [export] and [output] sections");
                self.add("Unknown keys are rejected; check for typos");
            }
            ConfigError::Invalid { key, .. } => {
                self.add(format!("Fix or remove '{key}' in the configuration file"));
            }
        }
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use std::io::ErrorKind;

        if self.has_typed_hints {
            return;
        }
        let Some(source) = err.downcast_ref::<io::Error>() else {
            return;
        };

        self.mark_typed();

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File is not valid UTF-8 text");
                self.add("MolFiles must be plain text");
            }

            ErrorKind::BrokenPipe => {
                self.add("Broken pipe, output consumer terminated");
                self.add("This may occur when piping to commands like `head`");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no smiles") || msg.contains("empty") {
            self.add("Pass a SMILES or MolFile path as the first argument");
            self.add("Or pipe a MolFile and use `-` as the input");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
