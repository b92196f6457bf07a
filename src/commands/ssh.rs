use crate::commands::{execute_blocking, LoginArgs, SubCommand};
use crate::config::SshConfig;
use crate::core::context::CommandContext;
use crate::core::types::{CommandOutput, Protocol};
use crate::error::Result;
use crate::transport::SshSession;
use async_trait::async_trait;
use log::debug;

#[derive(Debug, Clone, clap::Args)]
pub struct SshArgs {
    #[command(flatten)]
    pub login: LoginArgs,
}

pub struct SshCommand;

impl SshCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SshCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubCommand for SshCommand {
    type Args = SshArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<CommandOutput> {
        let login = args.login;
        let target = ctx.target(Protocol::Ssh, &login.host, &login.username, &login.password);
        let config = SshConfig::default().with_timeout(ctx.timeout);
        debug!("SSH target: {:?}", target);

        execute_blocking(SshSession::new(target, config), login.command).await
    }
}
