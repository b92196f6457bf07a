use crate::core::context::CommandContext;
use crate::core::types::CommandOutput;
use crate::error::Result;
use crate::transport::Transport;
use async_trait::async_trait;
use std::io;

/// Base trait for all subcommands
#[async_trait]
pub trait SubCommand {
    type Args;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<CommandOutput>;
}

/// Positional arguments every subcommand starts with
#[derive(Debug, Clone, clap::Args)]
pub struct LoginArgs {
    /// Remote host name or address
    pub host: String,

    /// Login user
    pub username: String,

    /// Login password
    pub password: String,

    /// Shell command to run (quote it)
    pub command: String,
}

/// Run one session on the blocking pool. The session owns its socket for
/// the whole call, so nothing else can touch it while it sleeps.
pub async fn execute_blocking<T>(mut transport: T, command: String) -> Result<CommandOutput>
where
    T: Transport + Send + 'static,
{
    tokio::task::spawn_blocking(move || transport.execute(&command))
        .await
        .map_err(io::Error::from)?
}

pub mod runner;
pub mod ssh;
pub mod telnet;
