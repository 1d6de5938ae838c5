use anyhow::{Context, Result};
use meeting_setup::run_setup;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let root = std::env::current_dir().context("Failed to resolve working directory")?;

    if let Err(e) = run_setup(&root).await {
        eprintln!("[ERROR] {}", e);
        std::process::exit(e.exit_code());
    }

    println!("Setup complete.");
    Ok(())
}
