//! chatline CLI: terminal chat client and relay server

use chatline_engine::{
    config::ENDPOINT_ENV, spawn_turn, ChatSession, ChatTransport, Config, HttpTransport,
    TurnEventKind, ERROR_REPLY,
};
use chatline_server::ServerConfig;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Streaming chat client with a terminal UI
#[derive(Parser)]
#[command(name = "chatline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by the client commands.
#[derive(clap::Args, Default)]
struct ClientArgs {
    /// Chat endpoint URL (overrides the config file)
    #[arg(long, env = ENDPOINT_ENV)]
    endpoint: Option<String>,

    /// Config file (default: ./chatline.json if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat UI (default when no command specified)
    Tui {
        #[command(flatten)]
        client: ClientArgs,

        /// Write logs to this file (the UI owns the terminal)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Send one message and stream the reply to stdout
    Send {
        /// Message text
        message: String,

        #[command(flatten)]
        client: ClientArgs,
    },

    /// Run the relay server in front of Ollama
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:5000")]
        bind: SocketAddr,

        /// Ollama base URL (overrides OLLAMA_HOST)
        #[arg(long)]
        ollama_host: Option<String>,

        /// Model name (overrides CHATLINE_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    match cli.command {
        None => run_tui(&rt, &ClientArgs::default(), None),
        Some(Commands::Tui { client, log_file }) => run_tui(&rt, &client, log_file.as_deref()),
        Some(Commands::Send { message, client }) => {
            init_stderr_logging();
            let config = load_config(&client);
            match rt.block_on(cmd_send(config, &message)) {
                Ok(true) => {}
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Serve {
            bind,
            ollama_host,
            model,
        }) => {
            init_stderr_logging();
            let mut config = ServerConfig::from_env();
            config.bind = bind;
            if let Some(host) = ollama_host {
                config.ollama_host = host;
            }
            if let Some(model) = model {
                config.model = model;
            }
            if let Err(e) = rt.block_on(chatline_server::serve(config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}

fn run_tui(rt: &tokio::runtime::Runtime, client: &ClientArgs, log_file: Option<&Path>) {
    if let Some(path) = log_file {
        if let Err(e) = init_file_logging(path) {
            eprintln!("Error: cannot open log file {}: {e}", path.display());
            std::process::exit(1);
        }
    }
    let config = load_config(client);
    if let Err(e) = rt.block_on(chatline_tui::run_tui(config)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Resolve the client config: file, then environment, then flags.
fn load_config(client: &ClientArgs) -> Config {
    let mut config = match Config::discover(client.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load config: {e}");
            std::process::exit(1);
        }
    };
    if let Some(endpoint) = client.endpoint.as_ref().filter(|e| !e.trim().is_empty()) {
        config.endpoint.clone_from(endpoint);
    }
    config
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_file_logging(path: &Path) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

/// Send one message and print the reply as it streams.
///
/// Returns `Ok(false)` when the request failed; the fixed error reply has
/// been printed in that case.
async fn cmd_send(config: Config, message: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let transport: Arc<dyn ChatTransport> = Arc::new(HttpTransport::from_config(&config)?);
    let mut session = ChatSession::new();
    let Some(ticket) = session.submit(message) else {
        return Err("message is empty".into());
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_turn(transport, ticket, tx);

    let mut stdout = std::io::stdout();
    let mut failed = false;
    while let Some(event) = rx.recv().await {
        match &event.kind {
            TurnEventKind::Chunk(text) => {
                write!(stdout, "{text}")?;
                stdout.flush()?;
            }
            TurnEventKind::Failed(_) => failed = true,
            _ => {}
        }
        session.apply(event);
    }

    writeln!(stdout)?;
    if failed {
        writeln!(stdout, "{ERROR_REPLY}")?;
    }
    Ok(!failed)
}
