use crate::clean::CleanStrategy;
use crate::cli::parse_seconds;
use crate::commands::{execute_blocking, LoginArgs, SubCommand};
use crate::config::TelnetConfig;
use crate::core::context::CommandContext;
use crate::core::types::{CommandOutput, Protocol};
use crate::error::Result;
use crate::transport::TelnetSession;
use async_trait::async_trait;
use log::debug;
use std::time::Duration;

#[derive(Debug, Clone, clap::Args)]
pub struct CmdArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    /// Seconds to wait for the command to finish [default: 2]
    #[arg(value_parser = parse_seconds)]
    pub wait_time: Option<Duration>,

    /// Also drop the line right after each command echo
    #[arg(long)]
    pub skip_following_line: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct TelnetArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    /// Seconds to wait before logging out [default: 0.5]
    #[arg(value_parser = parse_seconds)]
    pub wait_time: Option<Duration>,
}

/// Telnet login with a fixed dwell, echo-skip cleaning. Output that arrives
/// after the dwell is lost.
pub struct CmdCommand;

impl CmdCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CmdCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubCommand for CmdCommand {
    type Args = CmdArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<CommandOutput> {
        let mut config = TelnetConfig::echo_skip()
            .with_timeout(ctx.timeout)
            .with_clean(CleanStrategy::EchoSkip {
                skip_following: args.skip_following_line,
            });
        if let Some(wait) = args.wait_time {
            config = config.with_post_command_wait(wait);
        }
        run_telnet(ctx, args.login, config).await
    }
}

/// Telnet login that logs out after a short dwell and keeps the lines
/// between the command echo and the logout.
pub struct TelnetCommand;

impl TelnetCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TelnetCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubCommand for TelnetCommand {
    type Args = TelnetArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<CommandOutput> {
        let mut config = TelnetConfig::window_slice().with_timeout(ctx.timeout);
        if let Some(wait) = args.wait_time {
            config = config.with_post_command_wait(wait);
        }
        run_telnet(ctx, args.login, config).await
    }
}

async fn run_telnet(
    ctx: &CommandContext,
    login: LoginArgs,
    config: TelnetConfig,
) -> Result<CommandOutput> {
    let target = ctx.target(Protocol::Telnet, &login.host, &login.username, &login.password);
    debug!("Telnet target: {:?}, config: {:?}", target, config);

    execute_blocking(TelnetSession::new(target, config), login.command).await
}
