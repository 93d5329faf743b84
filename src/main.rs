// src/main.rs

use devwatch::errors::{DevwatchError, Result};
use devwatch::{cli, logging, run};

/// Conventional exit status for a process ended by SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(()) => {}
        Err(DevwatchError::Interrupted) => std::process::exit(EXIT_INTERRUPTED),
        Err(err) => {
            eprintln!("devwatch error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
