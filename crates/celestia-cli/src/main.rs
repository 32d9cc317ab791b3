mod cli;
mod commands;

use celestia_client::{Client, ClientOptions};
use clap::Parser;
use eyre::WrapErr;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let options = ClientOptions::default().with_request_timeout(args.request_timeout());
    let client = Client::with_options(&args.rpc_url, args.auth_token.as_deref(), options)
        .wrap_err_with(|| format!("connect to node RPC at {}", args.rpc_url))?;

    if args.auth_token.is_none() {
        tracing::warn!("no auth token given; only public methods will succeed");
    }

    let result = commands::run(&client, &args.command).await;
    client.close();

    let output = result?;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("render output")?
    );
    Ok(())
}
