use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use super::error::Error;
use super::session::Channel;
use super::BRIDGE_SCRIPT;

/// Runs the bridge script in a child Python interpreter and talks to it over
/// its standard streams.
pub struct ProcessChannel {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl ProcessChannel {
    pub fn spawn(python: &str) -> Result<Self, Error> {
        debug!(python, "starting toolkit bridge");

        let mut child = Command::new(python)
            .arg("-u")
            .arg("-c")
            .arg(BRIDGE_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| Error::Launch {
                program: python.to_string(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            return Err(Error::Protocol(
                "bridge process was started without piped streams".to_string(),
            ));
        };

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
        })
    }
}

impl Channel for ProcessChannel {
    fn exchange(&mut self, line: &str) -> Result<String, Error> {
        let stdin = self.stdin.as_mut().ok_or(Error::Closed)?;

        let sent = writeln!(stdin, "{line}").and_then(|_| stdin.flush());
        if let Err(e) = sent {
            return Err(match e.kind() {
                ErrorKind::BrokenPipe => Error::Closed,
                _ => Error::Io { source: e },
            });
        }

        let mut reply = String::new();
        if self.stdout.read_line(&mut reply)? == 0 {
            return Err(Error::Closed);
        }
        Ok(reply)
    }
}

impl Drop for ProcessChannel {
    fn drop(&mut self) {
        // EOF on stdin ends the bridge loop.
        drop(self.stdin.take());
        match self.child.wait() {
            Ok(status) if !status.success() => warn!(%status, "toolkit bridge exited abnormally"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to reap toolkit bridge"),
        }
    }
}
