mod cli;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 初始化日志系统
    mdpost::logger::init_logger(cli.verbose);

    match cli::run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {:#}", "错误:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
