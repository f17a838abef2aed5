// Entrypoint for the CLI application.
// - Keeps `main` small: parse the optional host/port arguments, create an
//   API client and hand it to the UI loop.
// - Returns `anyhow::Result` so startup failures print a clean message.

use anyhow::{Context, Result};
use smarthome_cli::{api::ApiClient, ui::main_menu};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;

fn main() -> Result<()> {
    // Logging goes to stderr and stays quiet unless RUST_LOG says
    // otherwise, so it never interleaves with the menu.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (host, port) = parse_args(std::env::args().skip(1))?;
    let api = ApiClient::new(&host, port)?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api)?;
    Ok(())
}

/// Two optional positional arguments: host then port. Anything beyond
/// those is ignored.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(String, u16)> {
    let host = args.next().unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("porta invalida: {raw}"))?,
        None => DEFAULT_PORT,
    };
    Ok((host, port))
}
