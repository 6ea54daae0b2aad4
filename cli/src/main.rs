mod commands;
mod sink;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, scan};
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    let cfg = commands.to_config();

    print::banner(cfg.quiet);
    print::header("starting scanner", cfg.quiet);

    let exit: ExitCode = match scan::scan(&commands, &cfg).await {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    };

    print::end_of_program();
    exit
}
