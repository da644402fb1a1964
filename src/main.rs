use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use confix::cli::{Cli, Command};
use confix::commands;
use confix::error::ConfixError;
use confix::logging::{self, Logger};

/// Exit code for failures that are not a [`ConfixError`].
const EXIT_INTERNAL: u8 = 2;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let name = args.command.log_name();
    logging::init_subscriber(args.verbose, name);
    let log = Arc::new(Logger::new(name));

    match run(&args, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log.error(&format!("{err:#}"));
            if err.downcast_ref::<ConfixError>().is_some() {
                ExitCode::FAILURE
            } else {
                if let Some(path) = log.log_path() {
                    log.error(&format!("see {} for details", path.display()));
                }
                ExitCode::from(EXIT_INTERNAL)
            }
        }
    }
}

fn run(args: &Cli, log: &Arc<Logger>) -> Result<()> {
    let global = &args.global;
    match &args.command {
        Command::SetRepo { path } => commands::set_repo::run(global, path, log),
        Command::SetMergeTool { path } => commands::set_merge_tool::run(global, path, log),
        Command::Add(opts) => commands::add::run(global, opts, log),
        Command::Link(opts) => commands::link::run(global, opts, log),
        Command::Unlink { file } => commands::unlink::run(global, file, log),
        Command::Rm { file } => commands::rm::run(global, file, log),
        Command::Merge { file } => commands::merge::run(global, file, log),
        Command::List { json } => commands::list::run(global, *json, log),
        Command::Info => commands::info::run(global, log),
        Command::Completions { shell } => {
            commands::completions::run(*shell);
            Ok(())
        }
        Command::Version => commands::version::run(),
    }
}
