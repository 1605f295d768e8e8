//! bedrock-console: interactive console for a Bedrock dedicated server
//!
//! Spawns the server executable given on the command line, prints its
//! structured console events as JSON lines, and forwards operator input
//! to the server's stdin.

use anyhow::Result;
use bedrock_bridge::{BedrockServer, ServerEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1) else {
        anyhow::bail!("usage: bedrock-console <path-to-server-executable>");
    };

    let mut server = BedrockServer::new(path)?;
    let mut events = server.subscribe();
    server.start()?;

    info!("Server started from {}", path);
    if let Some(name) = server.properties().server_name() {
        info!("Server name: {}", name);
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut input = stdin.lines();

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(ServerEvent::Console(console)) => {
                        println!("{}", serde_json::to_string(&console)?);
                    }
                    Ok(ServerEvent::Stderr(text)) => warn!("server stderr: {}", text.trim_end()),
                    Ok(ServerEvent::Closed) => {
                        info!("Server closed");
                        break;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(n)) => warn!("Dropped {} events", n),
                    Err(RecvError::Closed) => break,
                }
            }
            line = input.next_line() => {
                match line? {
                    Some(line) => server.write(line).await?,
                    None => break,
                }
            }
        }
    }

    Ok(())
}
