use crate::commands::ssh::SshArgs;
use crate::commands::telnet::{CmdArgs, TelnetArgs};
use crate::core::context::CommandContext;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Remote port [default: 23 for telnet, 22 for ssh]
    #[arg(long, short = 'p', global = true)]
    pub port: Option<u16>,

    /// Connect, prompt and read timeout in seconds. Over SSH it bounds the
    /// connection and login, not how long the remote command runs
    #[arg(long, short = 't', global = true, default_value = "10", value_parser = parse_timeout)]
    pub timeout: Duration,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Telnet: grab output after a fixed wait, drop echoes, prompts and exit lines
    ///
    /// The line right after each command echo is kept. Pass
    /// --skip-following-line to drop it as well.
    Cmd(CmdArgs),

    /// Telnet: log out after a short wait, keep lines between the echo and the logout
    Telnet(TelnetArgs),

    /// SSH: run the command on an exec channel and pass its exit status through
    Ssh(SshArgs),
}

impl Cli {
    pub fn context(&self) -> CommandContext {
        CommandContext::new()
            .with_port(self.port)
            .with_timeout(self.timeout)
    }
}

/// Process exit code for a failed parse: 0 for help and version output,
/// 1 for any usage error.
pub fn usage_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Non-negative decimal seconds
pub fn parse_seconds(s: &str) -> Result<Duration, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", s))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("'{}' is not a valid duration", s))
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let timeout = parse_seconds(s)?;
    if timeout.is_zero() {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(timeout)
}
