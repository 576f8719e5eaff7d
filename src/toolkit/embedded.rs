use pyo3::prelude::*;
use pyo3::types::PyModule;

use super::error::Error;
use super::session::Channel;
use super::BRIDGE_SCRIPT;

/// Runs the bridge script inside an embedded Python interpreter.
pub struct EmbeddedChannel {
    handler: Py<PyAny>,
}

impl EmbeddedChannel {
    pub fn load() -> Result<Self, Error> {
        Python::with_gil(|py| -> PyResult<Self> {
            let module = PyModule::from_code_bound(
                py,
                BRIDGE_SCRIPT,
                "aromaticity_bridge.py",
                "aromaticity_bridge",
            )?;
            let handler = module.getattr("handle_line")?.unbind();
            Ok(Self { handler })
        })
        .map_err(|e| Error::Python(e.to_string()))
    }
}

impl Channel for EmbeddedChannel {
    fn exchange(&mut self, line: &str) -> Result<String, Error> {
        Python::with_gil(|py| -> PyResult<String> {
            self.handler.call1(py, (line,))?.extract::<String>(py)
        })
        .map_err(|e| Error::Python(e.to_string()))
    }
}
