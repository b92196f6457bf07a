use crate::transport::{ExecChannel, RemoteExit};
use std::io;

/// Exec channel that answers from canned output instead of a server.
pub struct StubExecChannel {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_status: i32,
    pub signal: Option<String>,
    pub executed: Option<String>,
    pub fail_start: Option<io::ErrorKind>,
    echo: bool,
}

impl StubExecChannel {
    pub fn new() -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_status: 0,
            signal: None,
            executed: None,
            fail_start: None,
            echo: false,
        }
    }

    /// Behaves like a shell that only knows `echo`.
    pub fn echo() -> Self {
        Self {
            echo: true,
            ..Self::new()
        }
    }

    pub fn with_stdout(mut self, stdout: &str) -> Self {
        self.stdout = stdout.as_bytes().to_vec();
        self
    }

    pub fn with_stderr(mut self, stderr: &str) -> Self {
        self.stderr = stderr.as_bytes().to_vec();
        self
    }

    pub fn with_exit_status(mut self, status: i32) -> Self {
        self.exit_status = status;
        self
    }

    /// The remote process dies from `signal` instead of exiting.
    pub fn with_signal(mut self, signal: &str) -> Self {
        self.signal = Some(signal.to_string());
        self
    }

    pub fn fail_on_start(mut self, kind: io::ErrorKind) -> Self {
        self.fail_start = Some(kind);
        self
    }
}

impl ExecChannel for StubExecChannel {
    fn start(&mut self, command: &str) -> io::Result<()> {
        if let Some(kind) = self.fail_start {
            return Err(io::Error::new(kind, "channel request rejected"));
        }
        self.executed = Some(command.to_string());

        if self.echo {
            match command.strip_prefix("echo ") {
                Some(text) => self.stdout = format!("{}\n", text).into_bytes(),
                None => {
                    self.stderr = format!("sh: {}: not found\n", command).into_bytes();
                    self.exit_status = 127;
                }
            }
        }
        Ok(())
    }

    fn read_output(&mut self) -> io::Result<(Vec<u8>, Vec<u8>)> {
        Ok((
            std::mem::take(&mut self.stdout),
            std::mem::take(&mut self.stderr),
        ))
    }

    fn finish(&mut self) -> io::Result<RemoteExit> {
        Ok(match self.signal.clone() {
            Some(signal) => RemoteExit::Signal(signal),
            None => RemoteExit::Status(self.exit_status),
        })
    }
}
