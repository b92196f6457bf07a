use crate::config::SshConfig;
use crate::core::types::{CommandOutput, Target};
use crate::error::{Result, RunError};
use crate::transport::{connect_tcp, Transport};
use log::*;
use ssh2::{Channel, ErrorCode, HashType, Session};
use std::io::{self, Read};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

// LIBSSH2_ERROR_AUTHENTICATION_FAILED
const AUTHENTICATION_FAILED: ErrorCode = ErrorCode::Session(-18);

/// Exit status reported for a remote process killed by a signal.
pub const SIGNALLED_EXIT_STATUS: i32 = 255;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const READ_CHUNK: usize = 8192;

/// How the remote process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteExit {
    Status(i32),
    Signal(String),
}

/// A channel that runs one non-interactive command and reports its streams
/// and exit status.
pub trait ExecChannel {
    fn start(&mut self, command: &str) -> io::Result<()>;
    /// Collect stdout and stderr until the remote side closes both.
    fn read_output(&mut self) -> io::Result<(Vec<u8>, Vec<u8>)>;
    /// Wait for the remote process to exit.
    fn finish(&mut self) -> io::Result<RemoteExit>;
}

/// Exec channel bound to the session that owns it, so reads can switch the
/// session to non-blocking mode.
pub struct SessionChannel<'s> {
    session: &'s Session,
    channel: Channel,
}

impl<'s> SessionChannel<'s> {
    pub fn open(session: &'s Session) -> Result<Self> {
        let channel = session.channel_session()?;
        Ok(Self { session, channel })
    }
}

impl ExecChannel for SessionChannel<'_> {
    fn start(&mut self, command: &str) -> io::Result<()> {
        self.channel.exec(command)?;
        Ok(())
    }

    fn read_output(&mut self) -> io::Result<(Vec<u8>, Vec<u8>)> {
        let mut stdout = self.channel.stream(0);
        let mut stderr = self.channel.stderr();

        self.session.set_blocking(false);
        let collected = collect_streams(&mut stdout, &mut stderr, || thread::sleep(POLL_INTERVAL));
        self.session.set_blocking(true);
        collected
    }

    fn finish(&mut self) -> io::Result<RemoteExit> {
        self.channel.wait_close()?;
        if let Some(signal) = self.channel.exit_signal()?.exit_signal {
            return Ok(RemoteExit::Signal(signal));
        }
        Ok(RemoteExit::Status(self.channel.exit_status()?))
    }
}

/// Read two non-blocking streams in turn until both reach end of stream,
/// calling `idle` whenever neither has data. Both streams share one channel
/// window, so neither may be left unread while the other is drained.
pub fn collect_streams<O, E, F>(stdout: &mut O, stderr: &mut E, mut idle: F) -> io::Result<(Vec<u8>, Vec<u8>)>
where
    O: Read,
    E: Read,
    F: FnMut(),
{
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut out_done = false;
    let mut err_done = false;

    while !(out_done && err_done) {
        let mut progressed = false;
        if !out_done {
            match pump(stdout, &mut out)? {
                Some(0) => out_done = true,
                Some(_) => progressed = true,
                None => {}
            }
        }
        if !err_done {
            match pump(stderr, &mut err)? {
                Some(0) => err_done = true,
                Some(_) => progressed = true,
                None => {}
            }
        }
        if !progressed && !(out_done && err_done) {
            idle();
        }
    }
    Ok((out, err))
}

/// One read into `sink`. `None` when the stream has nothing right now.
fn pump<R: Read>(stream: &mut R, sink: &mut Vec<u8>) -> io::Result<Option<usize>> {
    let mut buffer = [0u8; READ_CHUNK];
    loop {
        match stream.read(&mut buffer) {
            Ok(n) => {
                sink.extend_from_slice(&buffer[..n]);
                return Ok(Some(n));
            }
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
            Err(e) => return Err(e),
        }
    }
}

/// Run `command` on `channel`, collecting both streams and the exit status.
/// A process killed by a signal reports `SIGNALLED_EXIT_STATUS`.
pub fn run_exec<C: ExecChannel>(channel: &mut C, command: &str) -> Result<CommandOutput> {
    debug!("Executing: {}", command);
    channel.start(command)?;

    let (stdout, stderr) = channel.read_output()?;
    let exit_status = match channel.finish()? {
        RemoteExit::Status(status) => status,
        RemoteExit::Signal(signal) => {
            warn!("Remote command killed by SIG{}", signal);
            SIGNALLED_EXIT_STATUS
        }
    };
    debug!(
        "Remote exited with {} ({} bytes stdout, {} bytes stderr)",
        exit_status,
        stdout.len(),
        stderr.len()
    );

    Ok(CommandOutput::new(
        String::from_utf8_lossy(&stdout),
        String::from_utf8_lossy(&stderr),
        exit_status,
    ))
}

/// Map a failed password authentication to the error users see.
pub fn auth_error(err: ssh2::Error, user: &str) -> RunError {
    if err.code() == AUTHENTICATION_FAILED {
        RunError::AuthenticationFailure {
            user: user.to_string(),
        }
    } else {
        err.into()
    }
}

/// libssh2 API timeout in milliseconds; 0 disables it.
pub fn api_timeout_ms(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

/// Lift the API timeout so the remote command may run as long as it needs.
pub fn unbound_command_runtime(session: &Session) {
    session.set_timeout(0);
}

/// Password-authenticated SSH session using the exec channel. Host keys are
/// not verified. The configured timeout bounds connect, handshake and
/// authentication only.
pub struct SshSession {
    target: Target,
    config: SshConfig,
}

impl SshSession {
    pub fn new(target: Target, config: SshConfig) -> Self {
        Self { target, config }
    }

    fn authenticate(&self, tcp: TcpStream) -> Result<Session> {
        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.set_timeout(api_timeout_ms(self.config.timeout));
        session.handshake()?;

        if let Some(hash) = session.host_key_hash(HashType::Sha256) {
            let fingerprint: String = hash.iter().map(|b| format!("{:02x}", b)).collect();
            debug!("Accepting host key sha256:{}", fingerprint);
        }

        session
            .userauth_password(&self.target.username, self.target.password())
            .map_err(|e| auth_error(e, &self.target.username))?;

        if !session.authenticated() {
            return Err(RunError::AuthenticationFailure {
                user: self.target.username.clone(),
            });
        }
        Ok(session)
    }
}

impl Transport for SshSession {
    fn execute(&mut self, command: &str) -> Result<CommandOutput> {
        info!(
            "{} session to {} as {}",
            self.target.protocol,
            self.target.address(),
            self.target.username
        );
        let tcp = connect_tcp(&self.target, self.config.timeout)?;
        tcp.set_read_timeout(None)?;
        tcp.set_write_timeout(None)?;
        let session = self.authenticate(tcp)?;
        unbound_command_runtime(&session);

        let result = SessionChannel::open(&session).and_then(|mut channel| run_exec(&mut channel, command));

        if let Err(e) = session.disconnect(None, "done", None) {
            debug!("Ignoring error on disconnect: {}", e);
        }
        result
    }
}
