use clap::Parser;
use remote_run::cli::{usage_exit_code, Cli};
use remote_run::commands::runner::{report, CommandRunner};
use std::io;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_exit_code(&e));
        }
    };

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let result = CommandRunner::new().run(cli).await;
    let code = report(result, &mut io::stdout().lock(), &mut io::stderr().lock());

    // Same truncation a POSIX shell applies to the remote status
    ExitCode::from((code & 0xff) as u8)
}
