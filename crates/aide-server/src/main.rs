//! Aide personal assistant host.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use aide_dispatch::Platform;
use aide_server::http::{create_router, responses::DispatchResponse};
use aide_server::{build_dispatcher, repl, AppState, Config};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Aide personal assistant.
#[derive(Parser, Debug)]
#[command(name = "aide", about = "Personal assistant command dispatcher")]
struct Cli {
    /// HTTP bind address
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Chat model name
    #[arg(long, global = true)]
    model: Option<String>,

    /// Directory for generated content and reminders
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// How the assistant addresses the user
    #[arg(long, global = true)]
    user_name: Option<String>,

    /// Per-handler time limit in seconds (0 disables)
    #[arg(long, global = true)]
    handler_timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve,

    /// Interactive chat on stdin
    Chat,

    /// Dispatch one instruction and print the outcome as JSON
    Run {
        /// Instruction text
        instruction: String,
    },

    /// Create a calendar reminder
    Remind {
        /// Start time as YYYY-MM-DD HH:MM
        datetime: String,

        /// Event summary
        message: String,
    },
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        if let Some(model) = &self.model {
            config.llm_model = model.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(name) = &self.user_name {
            config.user_name = name.clone();
        }
        if let Some(secs) = self.handler_timeout {
            config.handler_timeout_secs = Some(secs);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("aide=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = cli.apply(Config::load(Path::new(".env")));

    match &cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Chat => {
            let dispatcher = build_dispatcher(&config)?;
            repl::run(&dispatcher, &config.assistant_name, tokio::io::stdin(), tokio::io::stdout()).await?;
        }
        Commands::Run { instruction } => {
            let dispatcher = build_dispatcher(&config)?;
            let outcome = dispatcher.dispatch(instruction).await?;
            println!("{}", serde_json::to_string_pretty(&DispatchResponse::from(outcome))?);
        }
        Commands::Remind { datetime, message } => {
            let platform = Platform::system();
            let result =
                aide_dispatch::create_reminder(&config.reminders_dir(), platform.opener.as_ref(), datetime, message)
                    .await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = config.bind_addr.parse()?;
    let dispatcher = build_dispatcher(&config)?;
    let platform = Platform::system();

    let state = AppState::new(Arc::new(dispatcher), platform.opener.clone(), config.reminders_dir());
    let shutdown = state.shutdown.clone();
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown.notified() => info!("Exit instruction received"),
                _ = tokio::signal::ctrl_c() => info!("Interrupted"),
            }
        })
        .await?;

    info!("Aide stopped");
    Ok(())
}
