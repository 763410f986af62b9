// src/main.rs

use htmlshot::render::RunStatus;
use htmlshot::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(err) => {
            eprintln!("htmlshot error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<RunStatus> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
