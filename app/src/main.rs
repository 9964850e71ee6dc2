use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use todo_app::{Command, Reply, Session};
use todo_core::config::API_URL_ENV;
use todo_core::{ClientConfig, Theme, TodoClient};
use todo_sync::{ReqwestTransport, TodoSync};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Interactive todo list backed by a remote todo API.
#[derive(Debug, Parser)]
#[command(name = "todo", version)]
struct Args {
    /// Base URL of the todo API [default: http://localhost:8787]
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Theme to start with (light or dark)
    #[arg(long, default_value = "light")]
    theme: Theme,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::from_override(args.api_url);
    info!(api_url = %config.base_url, "starting session");

    let sync = TodoSync::new(TodoClient::from_config(&config), ReqwestTransport::new());
    let mut session = Session::new(sync, args.theme, !args.no_color);

    println!("{}", session.view());
    session.revalidate().await;
    println!("{}", session.view());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match session.handle(command).await {
            Reply::Quit => break,
            Reply::Continue(notice) => {
                if let Some(notice) = notice {
                    println!("{notice}");
                }
                println!("{}", session.view());
            }
        }
    }
    Ok(())
}
