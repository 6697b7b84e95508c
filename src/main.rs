use clap::error::ErrorKind;
use clap::Parser;
use log::error;
use std::process::ExitCode;
use symnmf::cli::{run, Cli, ERR_MSG};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            error!("{}", e);
            println!("{}", ERR_MSG);
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            println!("{}", ERR_MSG);
            ExitCode::FAILURE
        }
    }
}
