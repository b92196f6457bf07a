use crate::cli::{Cli, Commands};
use crate::commands::{
    ssh::SshCommand,
    telnet::{CmdCommand, TelnetCommand},
    SubCommand,
};
use crate::core::types::CommandOutput;
use crate::error::Result;
use log::debug;
use std::io::{self, Write};

/// Routes parsed CLI arguments to the matching subcommand
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self, cli: Cli) -> Result<CommandOutput> {
        debug!("CommandRunner::run() called with command: {:?}", cli.command);
        let ctx = cli.context();

        match cli.command {
            Commands::Cmd(args) => CmdCommand::new().run(&ctx, args).await,
            Commands::Telnet(args) => TelnetCommand::new().run(&ctx, args).await,
            Commands::Ssh(args) => SshCommand::new().run(&ctx, args).await,
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Print a session result and pick the process exit code: the remote
/// status on success, 1 on any failure. Failures print nothing to `out`.
pub fn report<O: Write, E: Write>(result: Result<CommandOutput>, out: &mut O, err: &mut E) -> i32 {
    match result {
        Ok(output) => match print_output(&output, out, err) {
            Ok(()) => output.exit_status,
            Err(e) => {
                let _ = writeln!(err, "Error: {}", e);
                1
            }
        },
        Err(e) => {
            let _ = writeln!(err, "Error: {}", e);
            1
        }
    }
}

fn print_output<O: Write, E: Write>(output: &CommandOutput, out: &mut O, err: &mut E) -> io::Result<()> {
    out.write_all(output.stdout.as_bytes())?;
    out.flush()?;
    err.write_all(output.stderr.as_bytes())?;
    err.flush()
}
