use crate::config::{CaptureMode, TelnetConfig, LOGIN_PROMPT, PASSWORD_PROMPT};
use crate::core::types::{CommandOutput, Target};
use crate::error::{Result, RunError};
use crate::transport::negotiation::{self, Negotiator};
use crate::transport::{connect_tcp, Transport};
use bytes::{BufMut, BytesMut};
use log::*;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

const BUFFER_SIZE: usize = 1024;

/// Telnet byte stream with option refusal and a buffer of decoded data
/// that has been received but not consumed yet.
pub struct TelnetConnection {
    stream: TcpStream,
    negotiator: Negotiator,
    pending: BytesMut,
    eof: bool,
}

impl TelnetConnection {
    pub fn connect(target: &Target, timeout: Duration) -> Result<Self> {
        debug!("=== Creating new telnet connection ===");
        let stream = connect_tcp(target, timeout)?;
        Ok(Self::from_stream(stream))
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        Self {
            stream,
            negotiator: Negotiator::new(),
            pending: BytesMut::new(),
            eof: false,
        }
    }

    /// One socket read. Decoded data lands in `pending`, negotiation
    /// replies go straight back to the server. Returns the raw byte count,
    /// 0 on end of stream.
    fn fill(&mut self) -> io::Result<usize> {
        let mut buffer = [0u8; BUFFER_SIZE];
        let bytes_read = loop {
            match self.stream.read(&mut buffer) {
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other?,
            }
        };

        if bytes_read == 0 {
            debug!("Server closed the connection");
            self.eof = true;
            return Ok(0);
        }

        let mut replies = BytesMut::new();
        self.negotiator
            .decode(&buffer[..bytes_read], &mut self.pending, &mut replies);
        if !replies.is_empty() {
            self.stream.write_all(&replies)?;
        }
        Ok(bytes_read)
    }

    /// Block until `prompt` shows up in the data stream, consuming
    /// everything up to and including it.
    pub fn wait_for_prompt(&mut self, prompt: &str, timeout: Duration) -> Result<BytesMut> {
        debug!("Waiting for {:?} prompt", prompt);
        let needle = prompt.as_bytes();
        let deadline = Instant::now() + timeout;
        let timed_out = || RunError::AuthPromptTimeout {
            prompt: prompt.to_string(),
        };

        loop {
            if let Some(pos) = find(&self.pending, needle) {
                return Ok(self.pending.split_to(pos + needle.len()));
            }
            if self.eof {
                return Err(RunError::ConnectionClosed);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(timed_out());
            }
            self.stream.set_read_timeout(Some(remaining))?;

            match self.fill() {
                Ok(_) => continue,
                Err(ref e)
                    if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
                {
                    return Err(timed_out());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Take everything that is available right now without blocking.
    pub fn read_available(&mut self) -> Result<BytesMut> {
        self.stream.set_nonblocking(true)?;
        let drained = self.drain();
        self.stream.set_nonblocking(false)?;
        drained?;

        if self.pending.is_empty() && self.eof {
            return Err(RunError::ConnectionClosed);
        }
        Ok(self.pending.split())
    }

    fn drain(&mut self) -> io::Result<()> {
        loop {
            match self.fill() {
                Ok(0) => return Ok(()),
                Ok(_) => continue,
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    /// Read until the server hangs up. Each read is bounded by `timeout`.
    pub fn read_to_end(&mut self, timeout: Duration) -> Result<BytesMut> {
        self.stream.set_read_timeout(Some(timeout))?;
        while !self.eof {
            self.fill()?;
        }
        Ok(self.pending.split())
    }

    /// Send `line` followed by a bare newline.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let mut request = negotiation::escape(line.as_bytes());
        request.put_u8(b'\n');
        self.stream.write_all(&request)?;
        Ok(())
    }

    pub fn close(self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            debug!("Ignoring error on close: {}", e);
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Prompt-driven Telnet login that runs one command and scrapes its output
/// out of the terminal transcript.
///
/// Completion of the remote command is never detected: the session waits
/// `post_command_wait` and takes what has arrived. Exit status is always 0.
pub struct TelnetSession {
    target: Target,
    config: TelnetConfig,
}

impl TelnetSession {
    pub fn new(target: Target, config: TelnetConfig) -> Self {
        Self { target, config }
    }

    fn login(&self, conn: &mut TelnetConnection) -> Result<()> {
        conn.wait_for_prompt(LOGIN_PROMPT, self.config.timeout)?;
        conn.write_line(&self.target.username)?;

        conn.wait_for_prompt(PASSWORD_PROMPT, self.config.timeout)?;
        conn.write_line(self.target.password())?;

        thread::sleep(self.config.settle_delay);
        let banner = conn.read_available()?;
        debug!("Discarded {} bytes of login banner", banner.len());
        Ok(())
    }

    fn capture(&self, conn: &mut TelnetConnection, command: &str) -> Result<BytesMut> {
        debug!("Sending command: {}", command);
        conn.write_line(command)?;
        thread::sleep(self.config.post_command_wait);

        match self.config.capture {
            CaptureMode::Drain => {
                let raw = conn.read_available()?;
                if let Err(e) = conn.write_line("exit") {
                    debug!("Failed to send exit: {}", e);
                }
                thread::sleep(self.config.exit_grace);
                Ok(raw)
            }
            CaptureMode::UntilClose => {
                conn.write_line("exit")?;
                conn.read_to_end(self.config.timeout)
            }
        }
    }
}

impl Transport for TelnetSession {
    fn execute(&mut self, command: &str) -> Result<CommandOutput> {
        info!(
            "{} session to {} as {}",
            self.target.protocol,
            self.target.address(),
            self.target.username
        );
        let mut conn = TelnetConnection::connect(&self.target, self.config.timeout)?;

        let raw = self
            .login(&mut conn)
            .and_then(|_| self.capture(&mut conn, command));
        conn.close();
        let raw = raw?;

        debug!("Captured {} bytes", raw.len());
        let transcript = String::from_utf8_lossy(&raw);
        let cleaned = self.config.clean.apply(&transcript, command);

        Ok(CommandOutput::new(format!("{}\n", cleaned), "", 0))
    }
}
