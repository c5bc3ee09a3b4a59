// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::Cli;

mod cli;
mod commands;
mod logging;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = run().await {
        log::error!("{}", e);
        if let Some(cause) = std::error::Error::source(&e) {
            log::debug!("caused by: {cause}");
        }
        log::logger().flush();
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    commands::dispatch(args).await
}
