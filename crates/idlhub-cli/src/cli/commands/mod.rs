mod init;
mod pull;
mod push;

use crate::cli::args::{Cli, Command};
use crate::exit_codes::EXIT_SUCCESS;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Init(args) => init::run(&cli.config, args),
        Command::Push(args) => push::run(&cli.config, args).await,
        Command::Pull => pull::run(&cli.config).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(EXIT_SUCCESS)
        }
    }
}
