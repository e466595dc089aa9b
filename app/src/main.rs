use std::process::ExitCode;

use clap::Parser;
use worldclient_export::ExportArgs;

fn main() -> ExitCode {
    let args = ExportArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    match worldclient_export::run(&args) {
        Ok(summary) => {
            for skipped in summary.problems() {
                log::warn!("skipped '{}': {}", skipped.name, skipped.reason);
            }
            if summary.cancelled {
                log::warn!("export was cancelled; the document holds the objects written so far");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
