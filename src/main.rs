// src/main.rs

use deckbake::errors::Result;
use deckbake::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("deckbake error: {err}");
        std::process::exit(1);
    }
}

async fn run_main() -> Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
