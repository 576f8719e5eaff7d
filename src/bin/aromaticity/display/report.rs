use std::io::{self, Write};
use std::path::PathBuf;

use serde_json::{Map, Value, json};

use aromaticity::{
    MolFileVersion, MoleculeSource, OutputFormat, Property, PropertyValue, StructureSummary,
    SvgSize, ToolkitInfo,
};

const NAME_LABEL: &str = "IUPAC NAME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    MolFile(MolFileVersion),
    Svg(SvgSize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub kind: ExportKind,
    /// Path as shown to the user.
    pub path: PathBuf,
}

impl ExportRecord {
    fn message(&self) -> String {
        match self.kind {
            ExportKind::MolFile(_) => format!(
                "The MolFile has been successfully exported to: {}",
                self.path.display()
            ),
            ExportKind::Svg(_) => format!(
                "The SVG has been successfully exported to: {}",
                self.path.display()
            ),
        }
    }

    fn label(&self) -> &'static str {
        match self.kind {
            ExportKind::MolFile(_) => "EXPORT MOLFILE",
            ExportKind::Svg(_) => "EXPORT SVG",
        }
    }

    fn to_json(&self) -> Value {
        let path = self.path.display().to_string();
        match self.kind {
            ExportKind::MolFile(version) => json!({
                "kind": "molfile",
                "version": version.as_str(),
                "path": path,
            }),
            ExportKind::Svg(size) => json!({
                "kind": "svg",
                "width": size.width(),
                "height": size.height(),
                "path": path,
            }),
        }
    }
}

/// Writes report items to stdout as they are produced.
///
/// Text reports print one `LABEL value` line per item immediately; JSON
/// reports collect everything and print a single object from [`finish`].
///
/// [`finish`]: ReportWriter::finish
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
    color: bool,
    precision: Option<usize>,
    properties: Map<String, Value>,
    name: Option<Value>,
    exports: Vec<Value>,
    summary: Option<Value>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat, color: bool, precision: Option<usize>) -> Self {
        Self {
            out,
            format,
            color,
            precision,
            properties: Map::new(),
            name: None,
            exports: Vec::new(),
            summary: None,
        }
    }

    pub fn property(&mut self, property: Property, value: &PropertyValue) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let rendered = value.render(self.precision);
                self.line(property.label(), &rendered)
            }
            OutputFormat::Json => {
                self.properties
                    .insert(property.key().to_string(), json_value(value, self.precision));
                Ok(())
            }
        }
    }

    /// Records the IUPAC lookup outcome; `None` means no name was found.
    pub fn name(&mut self, name: Option<&str>) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => match name {
                Some(name) => self.line(NAME_LABEL, name),
                None => Ok(()),
            },
            OutputFormat::Json => {
                self.name = Some(name.map_or(Value::Null, |n| Value::String(n.to_string())));
                Ok(())
            }
        }
    }

    pub fn export(&mut self, record: &ExportRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.line(record.label(), &record.message()),
            OutputFormat::Json => {
                self.exports.push(record.to_json());
                Ok(())
            }
        }
    }

    /// Only JSON reports carry the summary; text mode shows it as a table.
    pub fn summary(&mut self, summary: &StructureSummary) {
        if self.format == OutputFormat::Json {
            self.summary = serde_json::to_value(summary).ok();
        }
    }

    pub fn finish(mut self, source: &MoleculeSource, toolkit: &ToolkitInfo) -> io::Result<W> {
        if self.format == OutputFormat::Json {
            let mut report = Map::new();
            report.insert(
                "input".to_string(),
                json!({ "kind": source.kind().to_string(), "value": source.describe() }),
            );
            report.insert(
                "toolkit".to_string(),
                json!({ "name": toolkit.name, "version": toolkit.version }),
            );
            report.insert("properties".to_string(), Value::Object(self.properties));
            if let Some(name) = self.name.take() {
                report.insert("iupac_name".to_string(), name);
            }
            if let Some(summary) = self.summary.take() {
                report.insert("summary".to_string(), summary);
            }
            report.insert("exports".to_string(), Value::Array(self.exports));

            serde_json::to_writer_pretty(&mut self.out, &Value::Object(report))?;
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(self.out)
    }

    /// Flushed at once so each line lands before any prompt or spinner that follows.
    fn line(&mut self, label: &str, value: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.out, "\x1b[1;32m{label}\x1b[0m {value}")?;
        } else {
            writeln!(self.out, "{label} {value}")?;
        }
        self.out.flush()
    }
}

fn json_value(value: &PropertyValue, precision: Option<usize>) -> Value {
    match (value, precision) {
        (PropertyValue::Real(v), Some(p)) => {
            let scale = 10f64.powi(p.min(15) as i32);
            json!((v * scale).round() / scale)
        }
        (PropertyValue::Count(v), _) => json!(v),
        (PropertyValue::Real(v), None) => json!(v),
        (PropertyValue::Text(v), _) => json!(v),
    }
}
