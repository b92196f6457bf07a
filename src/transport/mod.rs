pub mod negotiation;
pub mod ssh;
pub mod telnet;


pub use negotiation::Negotiator;
pub use ssh::{ExecChannel, RemoteExit, SshSession};
pub use telnet::{TelnetConnection, TelnetSession};

use crate::core::types::{CommandOutput, Target};
use crate::error::{Result, RunError};
use log::*;
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// One authenticated session that runs exactly one command.
pub trait Transport {
    fn execute(&mut self, command: &str) -> Result<CommandOutput>;
}

/// Resolve `target` and open a TCP stream with connect, read and write
/// timeouts set to `timeout`.
pub fn connect_tcp(target: &Target, timeout: Duration) -> Result<TcpStream> {
    let server_address = target.address();
    debug!("Connecting to address: {}", server_address);

    let address = server_address.to_socket_addrs()?.next().ok_or_else(|| {
        RunError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Could not resolve address {}", server_address),
        ))
    })?;
    debug!("Resolved address: {:?}", address);

    let stream = TcpStream::connect_timeout(&address, timeout).map_err(|e| match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => RunError::ConnectTimeout {
            addr: server_address.clone(),
            timeout,
        },
        _ => RunError::Io(e),
    })?;
    debug!("Connection established");

    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    Ok(stream)
}
