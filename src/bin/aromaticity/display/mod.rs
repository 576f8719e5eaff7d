mod banner;
mod error;
mod progress;
mod report;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use report::{ExportKind, ExportRecord, ReportWriter};
pub use tables::print_structure_summary;

#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Decorations (banner, spinners, tables) go to stderr.
    pub interactive: bool,
    /// Report labels on stdout may be coloured.
    pub color: bool,
}

impl Context {
    pub fn detect() -> Self {
        Self {
            interactive: crate::io::stderr_is_tty(),
            color: crate::io::stdout_is_tty() && std::env::var_os("NO_COLOR").is_none(),
        }
    }

    pub fn with_quiet(self, quiet: bool) -> Self {
        if quiet {
            Self {
                interactive: false,
                ..self
            }
        } else {
            self
        }
    }
}
